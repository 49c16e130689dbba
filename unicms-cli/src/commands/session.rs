use std::io::{self, BufRead, Write};

use anyhow::{Context, Result, bail};
use clap::Args;
use rpassword::prompt_password;
use shared::{
    config::ClientConfig,
    models::{RegisterRequest, SessionUser},
};

use super::GlobalArgs;

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Account email; prompted for when omitted
    #[arg(long, short)]
    pub email: Option<String>,

    /// Read the password from the first line of standard input
    #[arg(long)]
    pub password_stdin: bool,
}

#[derive(Args, Debug)]
pub struct RegisterArgs {
    /// Display name; prompted for when omitted
    #[arg(long, short)]
    pub name: Option<String>,

    /// Account email; prompted for when omitted
    #[arg(long, short)]
    pub email: Option<String>,

    /// Read the password from the first line of standard input
    #[arg(long)]
    pub password_stdin: bool,
}

pub async fn login(global: &GlobalArgs, config: &ClientConfig, args: LoginArgs) -> Result<()> {
    let email = match args.email {
        Some(email) => email,
        None => prompt("Email: ")?,
    };
    let password = read_password(args.password_stdin)?;

    let api = global.gateway(config)?;
    let auth = api
        .login(&email, &password)
        .await
        .context("login failed")?;

    print_session_summary(&auth.user(), auth.user_id, &global.storage_location(config));
    Ok(())
}

pub async fn register(
    global: &GlobalArgs,
    config: &ClientConfig,
    args: RegisterArgs,
) -> Result<()> {
    let name = match args.name {
        Some(name) => name,
        None => prompt("Name: ")?,
    };
    let email = match args.email {
        Some(email) => email,
        None => prompt("Email: ")?,
    };
    let password = read_password(args.password_stdin)?;

    let api = global.gateway(config)?;
    let auth = api
        .register(&RegisterRequest {
            name,
            email,
            password,
        })
        .await
        .context("registration failed")?;

    print_session_summary(&auth.user(), auth.user_id, &global.storage_location(config));
    Ok(())
}

pub fn logout(global: &GlobalArgs, config: &ClientConfig) -> Result<()> {
    let session = global.open_session(config);
    let was_signed_in = session.is_authenticated();
    session
        .clear_auth()
        .context("failed to clear the stored session")?;

    let location = global.storage_location(config);
    if was_signed_in {
        println!("Signed out; session cleared at {location}");
    } else {
        println!("No active session at {location}");
    }
    Ok(())
}

pub fn whoami(global: &GlobalArgs, config: &ClientConfig) {
    let session = global.open_session(config);
    let state = session.snapshot();
    match (state.user, state.user_id) {
        (Some(user), Some(user_id)) => {
            print_session_summary(&user, user_id, &global.storage_location(config));
        }
        _ => println!("Not signed in"),
    }
}

fn prompt(message: &str) -> Result<String> {
    print!("{message}");
    io::stdout().flush().ok();
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let trimmed = input.trim().to_string();
    if trimmed.is_empty() {
        bail!("input must not be empty");
    }
    Ok(trimmed)
}

fn read_password(from_stdin: bool) -> Result<String> {
    let password = if from_stdin {
        let mut line = String::new();
        io::stdin()
            .lock()
            .read_line(&mut line)
            .context("failed to read password from stdin")?;
        line.trim_end_matches(['\r', '\n']).to_string()
    } else {
        prompt_password("Password: ")?
    };
    if password.trim().is_empty() {
        bail!("password must not be empty");
    }
    Ok(password)
}

fn print_session_summary(user: &SessionUser, user_id: i64, location: &str) {
    println!("Logged in as {}", user.email);
    println!("name: {}", user.name);
    println!("role: {}", user.role);
    println!("user id: {user_id}");
    println!("session stored in {location}");
}
