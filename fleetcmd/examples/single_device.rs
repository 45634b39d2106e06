//! Run a couple of commands against a single device, without an
//! inventory file.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example single_device -- --host sw-lab1.example.com --user admin --password secret
//! ```

use std::env;

use fleetcmd::{ConnectionParams, Credentials, DeviceExecutor, ProtocolEngine};
use secrecy::SecretString;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let params = ConnectionParams {
        host: args.host.clone(),
        port: None,
        platform: args.platform,
        credentials: Credentials {
            username: args.user,
            password: SecretString::from(args.password),
            enable_secret: None,
        },
    };

    let engine = ProtocolEngine::new();
    let commands = vec!["show version".to_string(), "show clock".to_string()];

    match engine.run_device(&args.host, &params, &commands).await {
        Ok(success) => {
            println!("connected via {:?}", success.via);
            for pair in &success.outputs {
                println!("{}\n", pair.command);
                println!("{}\n", pair.output);
            }
        }
        Err(failure) => {
            eprintln!("device failed: {failure}");
            std::process::exit(1);
        }
    }
}

/// Simple argument parser (avoiding external dependencies)
struct Args {
    host: String,
    user: String,
    password: String,
    platform: String,
}

impl Args {
    fn parse() -> Self {
        let args: Vec<String> = env::args().collect();
        let mut host = "localhost".to_string();
        let mut user = env::var("USER").unwrap_or_else(|_| "admin".to_string());
        let mut password = String::new();
        let mut platform = "cisco_ios".to_string();

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--host" | "-h" => {
                    i += 1;
                    if i < args.len() {
                        host = args[i].clone();
                    }
                }
                "--user" | "-u" => {
                    i += 1;
                    if i < args.len() {
                        user = args[i].clone();
                    }
                }
                "--password" | "-P" => {
                    i += 1;
                    if i < args.len() {
                        password = args[i].clone();
                    }
                }
                "--platform" | "-p" => {
                    i += 1;
                    if i < args.len() {
                        platform = args[i].clone();
                    }
                }
                _ => {
                    eprintln!("Unknown argument: {}", args[i]);
                }
            }
            i += 1;
        }

        Self {
            host,
            user,
            password,
            platform,
        }
    }
}
