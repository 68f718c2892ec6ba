//! Connection lifecycle over an abstract transport: hello on open, keepalive pings while
//! open, teardown on close or on the first failed send. Reconnecting is left to the host.

use engine_core::Interval;
use thiserror::Error;

use crate::protocol::{ClientMessage, ProtocolError};

/// Default seconds between keepalive pings.
pub const PING_INTERVAL_SECS: f32 = 20.0;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("transport is closed")]
    Closed,
    #[error("send failed: {0}")]
    Send(String),
    #[error(transparent)]
    Encode(#[from] ProtocolError),
}

/// Outbound half of a server link. Sends are fire-and-forget.
pub trait Transport {
    fn send_text(&mut self, text: String) -> Result<(), TransportError>;
}

pub struct Connection<T: Transport> {
    transport: Option<T>,
    keepalive: Interval,
}

impl<T: Transport> Connection<T> {
    /// Greet the server and start the keepalive. A failed hello yields a closed connection.
    pub fn open(transport: T, ping_interval: f32) -> Self {
        let mut connection = Self {
            transport: Some(transport),
            keepalive: Interval::idle(ping_interval),
        };
        if connection.send(&ClientMessage::Hello).is_ok() {
            connection.keepalive.start();
            log::info!("Connection open");
        }
        connection
    }

    pub fn is_open(&self) -> bool {
        self.transport.is_some()
    }

    pub fn keepalive_active(&self) -> bool {
        self.keepalive.is_active()
    }

    /// Advance the keepalive timer, sending one ping per elapsed period.
    pub fn tick(&mut self, dt: f32) {
        let due = self.keepalive.tick(dt);
        for _ in 0..due {
            if self.send(&ClientMessage::Ping).is_err() {
                break;
            }
        }
    }

    /// Encode and send. Any failure closes the connection.
    pub fn send(&mut self, message: &ClientMessage) -> Result<(), TransportError> {
        let Some(transport) = self.transport.as_mut() else {
            return Err(TransportError::Closed);
        };
        let result = message
            .to_json()
            .map_err(TransportError::from)
            .and_then(|text| transport.send_text(text));
        if let Err(e) = &result {
            log::warn!("Send failed, closing connection: {}", e);
            self.close();
        }
        result
    }

    /// Stop the keepalive and drop the transport. Idempotent.
    pub fn close(&mut self) {
        self.keepalive.cancel();
        if self.transport.take().is_some() {
            log::info!("Connection closed");
        }
    }

    pub fn transport(&self) -> Option<&T> {
        self.transport.as_ref()
    }
}

impl<T: Transport> Drop for Connection<T> {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct Recorder {
        sent: Rc<RefCell<Vec<String>>>,
        fail: Rc<RefCell<bool>>,
    }

    impl Transport for Recorder {
        fn send_text(&mut self, text: String) -> Result<(), TransportError> {
            if *self.fail.borrow() {
                return Err(TransportError::Send("socket gone".into()));
            }
            self.sent.borrow_mut().push(text);
            Ok(())
        }
    }

    #[test]
    fn connection_open_sends_hello() {
        let recorder = Recorder::default();
        let conn = Connection::open(recorder.clone(), 20.0);
        assert!(conn.is_open());
        assert!(conn.keepalive_active());
        assert_eq!(recorder.sent.borrow().as_slice(), [r#"{"initialConnection":true}"#]);
    }

    #[test]
    fn connection_pings_on_interval() {
        let recorder = Recorder::default();
        let mut conn = Connection::open(recorder.clone(), 20.0);
        for _ in 0..(45 * 10) {
            conn.tick(0.1);
        }
        let sent = recorder.sent.borrow();
        assert_eq!(sent.len(), 3);
        assert_eq!(sent[1], r#"{"type":"ping"}"#);
    }

    #[test]
    fn connection_close_stops_pings() {
        let recorder = Recorder::default();
        let mut conn = Connection::open(recorder.clone(), 1.0);
        conn.close();
        conn.close();
        assert!(!conn.is_open());
        assert!(!conn.keepalive_active());
        conn.tick(10.0);
        assert_eq!(recorder.sent.borrow().len(), 1);
        assert!(matches!(
            conn.send(&ClientMessage::Ping),
            Err(TransportError::Closed)
        ));
    }

    #[test]
    fn connection_failed_send_tears_down() {
        let recorder = Recorder::default();
        let mut conn = Connection::open(recorder.clone(), 1.0);
        *recorder.fail.borrow_mut() = true;
        conn.tick(1.5);
        assert!(!conn.is_open());
        assert!(!conn.keepalive_active());
    }

    #[test]
    fn connection_failed_hello_never_arms_keepalive() {
        let recorder = Recorder::default();
        *recorder.fail.borrow_mut() = true;
        let conn = Connection::open(recorder, 1.0);
        assert!(!conn.is_open());
        assert!(!conn.keepalive_active());
    }
}
