// progress spinner for in-flight turns
// purely cosmetic: never touches engine state, and stop() clears its line
// before anything else is printed

use std::io::{stdout, Write};
use std::time::Duration;

use crossterm::cursor::MoveToColumn;
use crossterm::execute;
use crossterm::terminal::{Clear, ClearType};
use tokio::task::JoinHandle;

const FRAMES: [char; 4] = ['|', '/', '-', '\\'];

pub struct Spinner {
    handle: JoinHandle<()>,
}

impl Spinner {
    pub fn start(label: &str) -> Self {
        let label = label.to_string();
        let handle = tokio::spawn(async move {
            let mut frame = 0usize;
            loop {
                print!("\r{} {label}", FRAMES[frame % FRAMES.len()]);
                let _ = stdout().flush();
                frame += 1;
                tokio::time::sleep(Duration::from_millis(100)).await;
            }
        });

        Self { handle }
    }

    pub fn stop(self) {
        self.handle.abort();
        let _ = execute!(stdout(), MoveToColumn(0), Clear(ClearType::CurrentLine));
    }
}
