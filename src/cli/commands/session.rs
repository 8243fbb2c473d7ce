use clap::{Arg, ArgAction, Command};

pub const CMD_LOGIN: &str = "login";
pub const CMD_REGISTER: &str = "register";
pub const CMD_LOGOUT: &str = "logout";
pub const CMD_WHOAMI: &str = "whoami";
pub const CMD_GOOGLE_URL: &str = "google-url";
pub const CMD_CALLBACK: &str = "callback";
pub const CMD_QUICK_LOGIN: &str = "quick-login";
pub const CMD_REFRESH: &str = "refresh";
pub const CMD_RENEW: &str = "renew";
pub const CMD_INVITATION: &str = "invitation";
pub const CMD_CHECK: &str = "check";

pub const ARG_EMAIL: &str = "email";
pub const ARG_PASSWORD: &str = "password";
pub const ARG_NAME: &str = "name";
pub const ARG_INVITATION: &str = "invitation";
pub const ARG_URL: &str = "url";
pub const ARG_TOKEN: &str = "token";
pub const ARG_PATH: &str = "path";
pub const ARG_ADMIN: &str = "admin";

fn email_arg() -> Arg {
    Arg::new(ARG_EMAIL)
        .short('e')
        .long("email")
        .help("Account email")
        .env("VORTIX_EMAIL")
}

fn password_arg() -> Arg {
    Arg::new(ARG_PASSWORD)
        .short('p')
        .long("password")
        .help("Account password")
        .env("VORTIX_PASSWORD")
        .hide_env_values(true)
        .required(true)
}

#[must_use]
pub fn with_subcommands(command: Command) -> Command {
    command
        .subcommand(
            Command::new(CMD_LOGIN)
                .about("Sign in with email and password")
                .arg(email_arg().required(true))
                .arg(password_arg()),
        )
        .subcommand(
            Command::new(CMD_REGISTER)
                .about("Create an account and sign in")
                .arg(email_arg().required_unless_present(ARG_INVITATION))
                .arg(password_arg())
                .arg(
                    Arg::new(ARG_NAME)
                        .long("name")
                        .help("Display name")
                        .required(true),
                )
                .arg(
                    Arg::new(ARG_INVITATION)
                        .long("invitation")
                        .help("Invitation token; pre-fills the email when --email is omitted"),
                ),
        )
        .subcommand(Command::new(CMD_LOGOUT).about("Forget the stored session"))
        .subcommand(Command::new(CMD_WHOAMI).about("Restore the stored session and show the user"))
        .subcommand(
            Command::new(CMD_GOOGLE_URL).about("Print the Google sign-in URL to open in a browser"),
        )
        .subcommand(
            Command::new(CMD_CALLBACK)
                .about("Complete Google sign-in from the callback URL")
                .arg(
                    Arg::new(ARG_URL)
                        .help("Full callback URL, including access_token and refresh_token")
                        .required(true),
                ),
        )
        .subcommand(Command::new(CMD_QUICK_LOGIN).about("Sign in with the demo account"))
        .subcommand(Command::new(CMD_REFRESH).about("Re-fetch the signed-in user"))
        .subcommand(Command::new(CMD_RENEW).about("Exchange the refresh token for a new pair"))
        .subcommand(
            Command::new(CMD_INVITATION)
                .about("Show a pending invitation")
                .arg(Arg::new(ARG_TOKEN).help("Invitation token").required(true)),
        )
        .subcommand(
            Command::new(CMD_CHECK)
                .about("Evaluate the route guard for a path against the stored session")
                .arg(Arg::new(ARG_PATH).help("Route path, e.g. /admin").required(true))
                .arg(
                    Arg::new(ARG_ADMIN)
                        .long("admin")
                        .help("Require an admin role")
                        .action(ArgAction::SetTrue),
                ),
        )
}
