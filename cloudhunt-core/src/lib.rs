pub mod hunt;
pub mod permutation;
pub mod report;

use colored::Colorize;

const BANNER: &str = r#"
          __                ____                __
    _____/ /___  __  ______/ / /_  __  ______  / /_
   / ___/ / __ \/ / / / __  / __ \/ / / / __ \/ __/
  / /__/ / /_/ / /_/ / /_/ / / / / /_/ / / / / /_
  \___/_/\____/\__,_/\__,_/_/ /_/\__,_/_/ /_/\__/
"#;

pub fn print_banner() {
    println!("{}", BANNER.green());
    println!(
        "  {} {}\n",
        "exposed cloud storage hunter".bright_white(),
        format!("v{}", env!("CARGO_PKG_VERSION")).green()
    );
}
