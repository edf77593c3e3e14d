// src/banner.rs

/// Prints the application startup banner to the console.
pub fn print_banner() {
    let banner = r#"
  ____       _                     _                                             _
 / ___| ___ | |__  _ __ __ _   _ __ | | __ _ _   _  __ _ _ __ ___  _   _ _ __   __| |
| |  _ / _ \| '_ \| '__/ _` | | '_ \| |/ _` | | | |/ _` | '__/ _ \| | | | '_ \ / _` |
| |_| | (_) | |_) | | | (_| | | |_) | | (_| | |_| | (_| | | | (_) | |_| | | | | (_| |
 \____|\___/|_.__/|_|  \__,_| | .__/|_|\__,_|\__, |\__, |_|  \___/ \__,_|_| |_|\__,_|
                              |_|            |___/ |___/

    Gobra Verification Server
"#;
    println!("{}", banner);
}
