use colored::Colorize;

const BANNER: &str = r#"
   __      _       _
  / _| ___| |_ ___| |__  _ __
 | |_ / _ \ __/ __| '_ \| '__|
 |  _|  __/ || (__| | | | |
 |_|  \___|\__\___|_| |_|_|
"#;

pub fn show_banner() {
    eprintln!("{}", BANNER.bright_magenta());
}
