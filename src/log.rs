use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

const LOG_FILE: &str = "train.log";

enum Target {
    #[cfg_attr(test, allow(dead_code))]
    Default,
    Off,
    File(PathBuf),
}

// unit tests keep the working directory clean
#[cfg(not(test))]
static TARGET: Mutex<Target> = Mutex::new(Target::Default);
#[cfg(test)]
static TARGET: Mutex<Target> = Mutex::new(Target::Off);

/// Redirects the file copy of every line. `None` logs to stdout only.
pub fn log_to(path: Option<PathBuf>) {
    if let Ok(mut target) = TARGET.lock() {
        *target = match path {
            Some(p) => Target::File(p),
            None => Target::Off,
        };
    }
}

fn log_path() -> Option<PathBuf> {
    match &*TARGET.lock().ok()? {
        Target::Default => Some(PathBuf::from(LOG_FILE)),
        Target::Off => None,
        Target::File(p) => Some(p.clone()),
    }
}

fn timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f").to_string()
}

// One line to stdout and the same line appended to the log file.
fn emit(line: &str) {
    print!("{line}");
    let Some(path) = log_path() else { return };
    if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(path) {
        // a failed log write must not stop training
        let _ = f.write_all(line.as_bytes());
    }
}

fn write_line(level: &str, msg: &str) {
    emit(&format!("[{}] {}: {}\n", timestamp(), level, msg));
}

pub fn info(msg: &str) {
    write_line("INFO", msg);
}

pub fn warn(msg: &str) {
    write_line("WARN", msg);
}

pub fn error(msg: &str) {
    write_line("ERROR", msg);
}

/// Numeric metric in a grep-friendly shape: `SCALAR step=.. name=.. value=..`.
pub fn scalar(step: u64, name: &str, value: f32) {
    emit(&format!("[{}] SCALAR step={} name={} value={:.6}\n", timestamp(), step, name, value));
}

/// Per-episode summary line.
pub fn episode(game: u32, score: u32, record: u32) {
    info(&format!("Game: {game}, score: {score}, Record: {record}"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_log_to_file_then_off() {
        let path = std::env::temp_dir().join(format!("snake_qlearn_log_{}.log", std::process::id()));
        let _ = fs::remove_file(&path);

        log_to(Some(path.clone()));
        scalar(7, "loss", 0.5);
        episode(3, 2, 4);
        log_to(None);

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("SCALAR step=7 name=loss value=0.500000\n"));
        assert!(text.contains("INFO: Game: 3, score: 2, Record: 4\n"));

        let before = text.len();
        warn("stdout only");
        assert_eq!(fs::read_to_string(&path).unwrap().len(), before);
        let _ = fs::remove_file(&path);
    }
}
