use snake_qlearn::{log, train};

fn main() {
    if let Err(e) = train::train() {
        log::error(&format!("training stopped: {e}"));
        std::process::exit(1);
    }
}
