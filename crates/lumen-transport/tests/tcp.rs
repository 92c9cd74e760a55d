//! Integration tests for the framed TCP transport.
//!
//! A real listener on an OS-assigned port, a real client, and raw byte
//! writes where we need to feed the reader something malformed.

use lumen_transport::{Connection, Frame, TcpConnection, TcpTransport, Transport, TransportError};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

async fn listener() -> (TcpTransport, String) {
    let transport = TcpTransport::bind("127.0.0.1:0").await.expect("should bind");
    let addr = transport.local_addr().expect("bound address").to_string();
    (transport, addr)
}

// =========================================================================
// Frames in both directions
// =========================================================================

#[tokio::test]
async fn test_frames_flow_both_ways() {
    let (mut transport, addr) = listener().await;
    let server = tokio::spawn(async move { transport.accept().await.expect("should accept") });

    let client = TcpConnection::connect(&addr).await.expect("should connect");
    let server_conn = server.await.expect("task should complete");
    assert_ne!(client.id(), server_conn.id());

    server_conn
        .send_frame(&Frame::new(0xCA, vec![0, 0, 0, 7]))
        .await
        .expect("send should succeed");
    server_conn
        .send_frame(&Frame::new(0xA2, Vec::new()))
        .await
        .expect("send should succeed");

    let first = client.recv_frame().await.unwrap().expect("frame");
    assert_eq!(first.opcode, 0xCA);
    assert_eq!(first.payload.as_ref(), &[0, 0, 0, 7]);

    let second = client.recv_frame().await.unwrap().expect("frame");
    assert_eq!(second.opcode, 0xA2);
    assert!(second.payload.is_empty());

    client
        .send_frame(&Frame::new(0x01, vec![9, 9]))
        .await
        .expect("send should succeed");
    let echoed = server_conn.recv_frame().await.unwrap().expect("frame");
    assert_eq!(echoed, Frame::new(0x01, vec![9, 9]));
}

#[tokio::test]
async fn test_close_is_seen_as_none() {
    let (mut transport, addr) = listener().await;
    let server = tokio::spawn(async move { transport.accept().await.expect("should accept") });

    let client = TcpConnection::connect(&addr).await.expect("should connect");
    let server_conn = server.await.unwrap();

    server_conn.close().await.expect("close should succeed");
    assert!(client.recv_frame().await.expect("clean close").is_none());
}

// =========================================================================
// Malformed input
// =========================================================================

#[tokio::test]
async fn test_bad_checksum_drops_only_that_frame() {
    let (mut transport, addr) = listener().await;
    let server = tokio::spawn(async move { transport.accept().await.expect("should accept") });

    let mut raw = TcpStream::connect(&addr).await.unwrap();
    let server_conn = server.await.unwrap();

    // Checksum field says 5, payload sums to 4.
    raw.write_all(&[0xB2, 0x4D, 0x00, 0x02, 0x00, 0x05, 0x00, 0x04])
        .await
        .unwrap();
    let good = Frame::new(0xB2, vec![0x00, 0x04]).to_bytes().unwrap();
    raw.write_all(&good).await.unwrap();

    let err = server_conn.recv_frame().await.unwrap_err();
    assert!(matches!(err, TransportError::Checksum { opcode: 0xB2, .. }));
    assert!(err.is_recoverable());

    let next = server_conn.recv_frame().await.unwrap().expect("frame");
    assert_eq!(next.payload.as_ref(), &[0x00, 0x04]);
}

#[tokio::test]
async fn test_bad_check_byte_is_fatal() {
    let (mut transport, addr) = listener().await;
    let server = tokio::spawn(async move { transport.accept().await.expect("should accept") });

    let mut raw = TcpStream::connect(&addr).await.unwrap();
    let server_conn = server.await.unwrap();

    raw.write_all(&[0xB2, 0xB2, 0x00, 0x00, 0x00, 0x00]).await.unwrap();

    let err = server_conn.recv_frame().await.unwrap_err();
    assert!(matches!(err, TransportError::Desync { opcode: 0xB2, check: 0xB2 }));
    assert!(!err.is_recoverable());
}

#[tokio::test]
async fn test_eof_mid_frame_is_an_error() {
    let (mut transport, addr) = listener().await;
    let server = tokio::spawn(async move { transport.accept().await.expect("should accept") });

    let mut raw = TcpStream::connect(&addr).await.unwrap();
    let server_conn = server.await.unwrap();

    raw.write_all(&[0xCA, 0x35, 0x00, 0x04]).await.unwrap();
    drop(raw);

    assert!(matches!(
        server_conn.recv_frame().await,
        Err(TransportError::ReceiveFailed(_))
    ));
}
