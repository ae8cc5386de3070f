use clap::{Arg, Command};

pub const ARG_COOKIE_NAME: &str = "cookie-name";
pub const ARG_SESSION_TTL_SECONDS: &str = "session-ttl-seconds";
pub const ARG_COOKIE_SECURE: &str = "cookie-secure";
pub const ARG_SAME_SITE: &str = "same-site";
pub const ARG_SESSION_ENCRYPTION_KEY: &str = "session-encryption-key";
pub const ARG_SESSION_MAC_KEY: &str = "session-mac-key";
pub const ARG_TOKEN_SIGNING_KEY: &str = "token-signing-key";
pub const ARG_TOKEN_AUDIENCE: &str = "token-audience";
pub const ARG_TOKEN_ISSUER: &str = "token-issuer";
pub const ARG_TOKEN_TTL_SECONDS: &str = "token-ttl-seconds";

#[must_use]
pub fn with_args(command: Command) -> Command {
    let command = with_cookie_args(command);
    let command = with_key_args(command);
    with_token_args(command)
}

fn with_cookie_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_COOKIE_NAME)
                .long(ARG_COOKIE_NAME)
                .help("Name of the session cookie")
                .env("SIGELO_COOKIE_NAME")
                .default_value("sigelo_session"),
        )
        .arg(
            Arg::new(ARG_SESSION_TTL_SECONDS)
                .long(ARG_SESSION_TTL_SECONDS)
                .help("Session cookie TTL in seconds")
                .env("SIGELO_SESSION_TTL_SECONDS")
                .default_value("86400")
                .value_parser(clap::value_parser!(i64)),
        )
        .arg(
            Arg::new(ARG_COOKIE_SECURE)
                .long(ARG_COOKIE_SECURE)
                .help("Set the Secure attribute on the session cookie")
                .env("SIGELO_COOKIE_SECURE")
                .default_value("true")
                .value_parser(clap::value_parser!(bool)),
        )
        .arg(
            Arg::new(ARG_SAME_SITE)
                .long(ARG_SAME_SITE)
                .help("SameSite policy for the session cookie: lax for same-site deployments, none for cross-domain (requires --cookie-secure)")
                .env("SIGELO_SAME_SITE")
                .default_value("lax")
                .value_parser(["lax", "none"]),
        )
}

fn with_key_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_SESSION_ENCRYPTION_KEY)
                .long(ARG_SESSION_ENCRYPTION_KEY)
                .help("Base64-encoded 32-byte key used to encrypt session cookies")
                .env("SIGELO_SESSION_ENCRYPTION_KEY")
                .required(true),
        )
        .arg(
            Arg::new(ARG_SESSION_MAC_KEY)
                .long(ARG_SESSION_MAC_KEY)
                .help("Base64-encoded 32-byte key used to sign session cookies")
                .env("SIGELO_SESSION_MAC_KEY")
                .required(true),
        )
        .arg(
            Arg::new(ARG_TOKEN_SIGNING_KEY)
                .long(ARG_TOKEN_SIGNING_KEY)
                .help("Base64-encoded 32-byte key used to sign bearer tokens; defaults to the session MAC key")
                .env("SIGELO_TOKEN_SIGNING_KEY"),
        )
}

fn with_token_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_TOKEN_AUDIENCE)
                .long(ARG_TOKEN_AUDIENCE)
                .help("Audience claim required in bearer tokens")
                .env("SIGELO_TOKEN_AUDIENCE")
                .default_value("sigelo"),
        )
        .arg(
            Arg::new(ARG_TOKEN_ISSUER)
                .long(ARG_TOKEN_ISSUER)
                .help("Issuer claim required in bearer tokens")
                .env("SIGELO_TOKEN_ISSUER")
                .default_value("https://sigelo.dev"),
        )
        .arg(
            Arg::new(ARG_TOKEN_TTL_SECONDS)
                .long(ARG_TOKEN_TTL_SECONDS)
                .help("Bearer token validity window in seconds")
                .env("SIGELO_TOKEN_TTL_SECONDS")
                .default_value("86400")
                .value_parser(clap::value_parser!(u64)),
        )
}
