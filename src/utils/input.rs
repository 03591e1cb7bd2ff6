use std::io::{self, BufRead};
use std::thread;
use tokio::sync::mpsc;
use tracing::debug;

/// Lines buffered between the reader thread and the editor loop
const LINE_BUFFER: usize = 16;

/// Read lines on a dedicated OS thread and hand them over a channel.
///
/// The thread is never joined, so a read blocked on a terminal does not keep
/// the runtime from shutting down. The channel closes at end of input.
pub fn spawn_line_reader<R>(reader: R) -> mpsc::Receiver<io::Result<String>>
where
    R: BufRead + Send + 'static,
{
    let (tx, rx) = mpsc::channel(LINE_BUFFER);

    thread::spawn(move || {
        for line in reader.lines() {
            let failed = line.is_err();
            if tx.blocking_send(line).is_err() {
                debug!("Editor loop gone, stopping input reader");
                return;
            }
            if failed {
                return;
            }
        }
        debug!("End of input");
    });

    rx
}

/// Line reader over the process's stdin
pub fn stdin_lines() -> mpsc::Receiver<io::Result<String>> {
    spawn_line_reader(io::BufReader::new(io::stdin()))
}
