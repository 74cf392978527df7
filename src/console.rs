//! Pretty terminal output with colors.
//! Used by: main.

use colored::Colorize;

pub fn print_banner() {
    println!();
    println!("{}", "╔═══════════════════════════════════════════════════════════╗".cyan());
    println!("{}", "║                                                           ║".cyan());
    println!("║     {}                                   ║", "Faultline v0.1.0".bold().white());
    println!("║     {}        ║", "Latency, timeout and error signals on tap".dimmed());
    println!("{}", "║                                                           ║".cyan());
    println!("{}", "╚═══════════════════════════════════════════════════════════╝".cyan());
    println!();
}

pub fn print_startup(addr: &str, db_path: &str) {
    println!("{} {}", "✓".green().bold(), "Server ready".white().bold());
    println!("  {} {}", "→".dimmed(), format!("http://{}", addr).cyan().underline());
    println!("  {} {}", "db:".dimmed(), db_path.white());
    println!();
    println!("{}", "Signals:".white().bold());
    println!("  {} {}   {}", "GET ".green(), "/metrics".white(), "Prometheus exposition".dimmed());
    println!("  {} {}     {}", "GET ".green(), "/error".white(), "Always 500".dimmed());
    println!("  {} {}   {}", "GET ".green(), "/latency".white(), "1s delay, no pass".dimmed());
    println!("  {} {}   {}", "GET ".green(), "/timeout".white(), "2s delay".dimmed());
    println!("  {} {}  {}", "GET ".green(), "/timeout5".white(), "5s delay".dimmed());
    println!("  {} {} {}", "GET ".green(), "/mstimeout".white(), "200ms delay".dimmed());
    println!();
    println!("{}", "Rows:".white().bold());
    println!("  {} {}         {}", "GET ".green(), "/get".white(), "List rows".dimmed());
    println!("  {} {}         {}", "POST".yellow(), "/add".white(), "Insert row".dimmed());
    println!("  {} {}    {}", "PUT ".yellow(), "/put/{id}".white(), "Update row".dimmed());
    println!("  {} {} {}", "DEL ".red(), "/delete/{id}".white(), "Delete row".dimmed());
    println!();
}
