#![forbid(unsafe_code)]

//! The input reader: stdin bytes to key messages.
//!
//! Two threads. The *pump* owns stdin and does nothing but blocking
//! reads, forwarding raw chunks over a channel; an empty chunk marks
//! EOF. The *decoder* owns the [`InputParser`] and the ESC
//! disambiguation timer: while the parser holds a partial sequence it
//! waits for follow-up bytes with a bounded `recv_timeout`, and on
//! expiry flushes the parser — a lone ESC becomes the Escape key, a
//! dangling prefix an unknown key.
//!
//! The split keeps the blocking read out of the timer path: the pump
//! may sit in `read(2)` forever, but the decoder always wakes up in
//! time to resolve an ambiguous prefix.
//!
//! Both threads end when the program drops the receiving end of the
//! message queue; at shutdown they are simply abandoned (the pump is
//! parked in a read that only more input or EOF can finish).

use std::io::{self, Read};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::Duration;

use chai_core::event::Event;
use chai_core::input_parser::InputParser;
use tracing::debug;

use crate::message::Msg;

/// Spawn the stdin pump and decoder threads.
///
/// Key events arrive on `queue` as [`Msg::Key`]; EOF (or a read error)
/// arrives as [`Msg::Quit`].
pub(crate) fn spawn_input_reader<U: Send + 'static>(
    queue: Sender<Msg<U>>,
    esc_timeout: Duration,
) -> io::Result<()> {
    let (chunk_tx, chunk_rx) = mpsc::channel::<Vec<u8>>();

    thread::Builder::new()
        .name("chai-stdin".into())
        .spawn(move || pump_stdin(&chunk_tx))?;

    thread::Builder::new()
        .name("chai-decode".into())
        .spawn(move || run_decoder(&chunk_rx, &queue, esc_timeout))?;

    Ok(())
}

/// Blocking-read stdin into raw chunks. An empty chunk signals EOF.
fn pump_stdin(chunks: &Sender<Vec<u8>>) {
    let mut stdin = io::stdin().lock();
    let mut buf = [0u8; 1024];
    loop {
        match stdin.read(&mut buf) {
            Ok(0) => {
                let _ = chunks.send(Vec::new());
                break;
            }
            Ok(n) => {
                if chunks.send(buf[..n].to_vec()).is_err() {
                    break;
                }
            }
            Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
            Err(err) => {
                debug!(%err, "stdin read failed");
                let _ = chunks.send(Vec::new());
                break;
            }
        }
    }
}

/// Decode chunks into key messages, resolving ambiguous prefixes after
/// `esc_timeout` of silence.
fn run_decoder<U: Send + 'static>(
    chunks: &Receiver<Vec<u8>>,
    queue: &Sender<Msg<U>>,
    esc_timeout: Duration,
) {
    let mut parser = InputParser::new();
    loop {
        let chunk = if parser.pending() {
            match chunks.recv_timeout(esc_timeout) {
                Ok(chunk) => Some(chunk),
                Err(RecvTimeoutError::Timeout) => None,
                Err(RecvTimeoutError::Disconnected) => break,
            }
        } else {
            match chunks.recv() {
                Ok(chunk) => Some(chunk),
                Err(_) => break,
            }
        };

        match chunk {
            // EOF marker from the pump.
            Some(chunk) if chunk.is_empty() => {
                if let Some(event) = parser.flush() {
                    if forward(queue, event).is_err() {
                        break;
                    }
                }
                let _ = queue.send(Msg::Quit);
                break;
            }
            Some(chunk) => {
                let mut closed = false;
                for event in parser.parse(&chunk) {
                    if forward(queue, event).is_err() {
                        closed = true;
                        break;
                    }
                }
                if closed {
                    break;
                }
            }
            // Disambiguation window expired.
            None => {
                if let Some(event) = parser.flush() {
                    if forward(queue, event).is_err() {
                        break;
                    }
                }
            }
        }
    }
}

fn forward<U>(queue: &Sender<Msg<U>>, event: Event) -> Result<(), ()> {
    let msg = match event {
        Event::Key(key) => Msg::Key(key),
        Event::Resize { width, height } => Msg::Resize { width, height },
    };
    queue.send(msg).map_err(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chai_core::event::{KeyCode, KeyEvent, Modifiers};

    fn decoder_fixture(
        esc_timeout: Duration,
    ) -> (
        Sender<Vec<u8>>,
        Receiver<Msg<()>>,
        thread::JoinHandle<()>,
    ) {
        let (chunk_tx, chunk_rx) = mpsc::channel::<Vec<u8>>();
        let (msg_tx, msg_rx) = mpsc::channel::<Msg<()>>();
        let handle = thread::spawn(move || run_decoder(&chunk_rx, &msg_tx, esc_timeout));
        (chunk_tx, msg_rx, handle)
    }

    #[test]
    fn bytes_decode_to_key_messages() {
        let (chunk_tx, msg_rx, handle) = decoder_fixture(Duration::from_millis(50));
        chunk_tx.send(b"q\x1b[A".to_vec()).expect("send chunk");
        assert_eq!(
            msg_rx.recv_timeout(Duration::from_secs(5)).ok(),
            Some(Msg::Key(KeyEvent::new(KeyCode::Char('q'))))
        );
        assert_eq!(
            msg_rx.recv_timeout(Duration::from_secs(5)).ok(),
            Some(Msg::Key(KeyEvent::new(KeyCode::Up)))
        );
        drop(chunk_tx);
        handle.join().expect("decoder exits");
    }

    #[test]
    fn lone_esc_times_out_to_escape_key() {
        let (chunk_tx, msg_rx, handle) = decoder_fixture(Duration::from_millis(20));
        chunk_tx.send(b"\x1b".to_vec()).expect("send chunk");
        assert_eq!(
            msg_rx.recv_timeout(Duration::from_secs(5)).ok(),
            Some(Msg::Key(KeyEvent::new(KeyCode::Escape)))
        );
        drop(chunk_tx);
        handle.join().expect("decoder exits");
    }

    #[test]
    fn esc_then_letter_within_window_is_alt() {
        // A generous window so the second chunk always lands inside it.
        let (chunk_tx, msg_rx, handle) = decoder_fixture(Duration::from_secs(2));
        chunk_tx.send(b"\x1b".to_vec()).expect("send chunk");
        chunk_tx.send(b"a".to_vec()).expect("send chunk");
        assert_eq!(
            msg_rx.recv_timeout(Duration::from_secs(5)).ok(),
            Some(Msg::Key(
                KeyEvent::new(KeyCode::Char('a')).with_modifiers(Modifiers::ALT)
            ))
        );
        drop(chunk_tx);
        handle.join().expect("decoder exits");
    }

    #[test]
    fn eof_surfaces_as_quit() {
        let (chunk_tx, msg_rx, handle) = decoder_fixture(Duration::from_millis(50));
        chunk_tx.send(Vec::new()).expect("send EOF marker");
        assert_eq!(
            msg_rx.recv_timeout(Duration::from_secs(5)).ok(),
            Some(Msg::Quit)
        );
        handle.join().expect("decoder exits");
        drop(chunk_tx);
    }

    #[test]
    fn pending_escape_flushes_before_eof_quit() {
        let (chunk_tx, msg_rx, handle) = decoder_fixture(Duration::from_secs(2));
        chunk_tx.send(b"\x1b".to_vec()).expect("send chunk");
        chunk_tx.send(Vec::new()).expect("send EOF marker");
        assert_eq!(
            msg_rx.recv_timeout(Duration::from_secs(5)).ok(),
            Some(Msg::Key(KeyEvent::new(KeyCode::Escape)))
        );
        assert_eq!(
            msg_rx.recv_timeout(Duration::from_secs(5)).ok(),
            Some(Msg::Quit)
        );
        handle.join().expect("decoder exits");
        drop(chunk_tx);
    }

    #[test]
    fn forward_reports_closed_queue() {
        let (tx, rx) = mpsc::channel::<Msg<()>>();
        drop(rx);
        assert!(forward(&tx, Event::Key(KeyEvent::new(KeyCode::Enter))).is_err());
    }
}
