//! Seam to the networking stack. The attempt only needs to lease
//! byte-oriented connections to bootstrap peers; dialing, peer selection,
//! and socket lifetimes stay on the other side of this trait.

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncWrite};

/// A live peer connection: written once per request, then streamed from
/// until the peer terminates the response.
pub trait Connection: AsyncRead + AsyncWrite + Send + Unpin + 'static {}

impl<T: AsyncRead + AsyncWrite + Send + Unpin + 'static> Connection for T {}

#[async_trait]
pub trait Transport: Send + Sync + 'static {
    type Conn: Connection;

    /// Dials some bootstrap peer. `None` means no peer is available, which
    /// ends the attempt.
    async fn connect_bootstrap_peer(&self) -> Option<Self::Conn>;
}
