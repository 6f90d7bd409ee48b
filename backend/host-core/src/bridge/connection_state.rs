//! Per-connection authentication state.

use std::net::SocketAddr;

/// Tracks whether one bridge client has presented the session token.
pub(crate) struct ConnectionState {
    peer: SocketAddr,
    expected_token: String,
    authenticated: bool,
}

impl ConnectionState {
    pub(crate) fn new(peer: SocketAddr, token: String) -> Self {
        Self {
            peer,
            expected_token: token,
            authenticated: false,
        }
    }

    /// Marks the connection authenticated if `token` matches.
    ///
    /// The comparison looks at every byte regardless of where the first
    /// mismatch is.
    pub(crate) fn validate_token(&mut self, token: &str) -> bool {
        let expected = self.expected_token.as_bytes();
        let presented = token.as_bytes();
        let matches = expected.len() == presented.len()
            && expected
                .iter()
                .zip(presented)
                .fold(0u8, |diff, (a, b)| diff | (a ^ b))
                == 0;

        self.authenticated = matches;
        matches
    }

    pub(crate) fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub(crate) fn peer(&self) -> SocketAddr {
        self.peer
    }
}
