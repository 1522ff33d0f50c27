//! `callguard config` – show config path and effective settings.

use anyhow::Result;
use callguard_core::config::{self, CallguardConfig};

pub fn run_config(cfg: &CallguardConfig) -> Result<()> {
    println!("config file: {}", config::config_path()?.display());
    println!(
        "base_url: {}",
        cfg.base_url.as_deref().unwrap_or("(none)")
    );
    let d = cfg.dispatch();
    println!("timeout_secs: {}", d.timeout_secs);
    println!("connect_timeout_secs: {}", d.connect_timeout_secs);
    println!("max_attempts: {}", d.max_attempts);
    println!("busy_delay_secs: {}", d.busy_delay_secs);
    match d.max_retry_after_secs {
        Some(cap) => println!("max_retry_after_secs: {}", cap),
        None => println!("max_retry_after_secs: (server decides)"),
    }
    println!("scheduler_threads: {}", d.scheduler_threads);
    Ok(())
}
