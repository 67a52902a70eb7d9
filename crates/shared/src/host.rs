use std::env;

/// Best-effort host name for report headers. Reads the environment the
/// way the OS populates it, falling back to `unknown`.
pub fn host_name() -> String {
    env::var("COMPUTERNAME")
        .or_else(|_| env::var("HOSTNAME"))
        .unwrap_or_else(|_| String::from("unknown"))
}
