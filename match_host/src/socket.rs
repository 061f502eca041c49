use proto::{SocketInbound, SocketReply};

/// Answer one text frame from the match socket.
///
/// `move` and `matchmaking` are accepted silently; the socket never drives a
/// simulation.
pub fn handle_socket_message(text: &str) -> Option<SocketReply> {
    match SocketInbound::parse(text) {
        Ok(SocketInbound::Join { alias }) => Some(SocketReply::welcome(&alias)),
        Ok(SocketInbound::Move | SocketInbound::Matchmaking) => None,
        Ok(SocketInbound::Unknown(kind)) => {
            log::debug!("socket message of unknown type {kind:?}");
            Some(SocketReply::unknown_type())
        }
        Err(e) => {
            log::warn!("malformed socket message: {e}");
            Some(SocketReply::invalid_format())
        }
    }
}
