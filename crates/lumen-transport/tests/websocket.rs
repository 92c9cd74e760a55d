//! Integration tests for the WebSocket transport.

#[cfg(feature = "websocket")]
mod websocket {
    use futures_util::{SinkExt, StreamExt};
    use lumen_transport::{Connection, Frame, Transport, TransportError, WebSocketConnection, WebSocketTransport};
    use tokio_tungstenite::tungstenite::Message;

    async fn listener() -> (WebSocketTransport, String) {
        let transport = WebSocketTransport::bind("127.0.0.1:0")
            .await
            .expect("should bind");
        let addr = transport.local_addr().expect("bound address").to_string();
        (transport, addr)
    }

    #[tokio::test]
    async fn test_frames_flow_both_ways() {
        let (mut transport, addr) = listener().await;
        let server = tokio::spawn(async move { transport.accept().await.expect("should accept") });

        let client = WebSocketConnection::connect(&format!("ws://{addr}"))
            .await
            .expect("should connect");
        let server_conn = server.await.expect("task should complete");

        server_conn
            .send_frame(&Frame::new(0xBD, vec![0, 1, 0, 2, 0, 0]))
            .await
            .expect("send should succeed");
        let frame = client.recv_frame().await.unwrap().expect("frame");
        assert_eq!(frame.opcode, 0xBD);
        assert_eq!(frame.payload.as_ref(), &[0, 1, 0, 2, 0, 0]);

        client
            .send_frame(&Frame::new(0x02, vec![1]))
            .await
            .expect("send should succeed");
        let back = server_conn.recv_frame().await.unwrap().expect("frame");
        assert_eq!(back, Frame::new(0x02, vec![1]));

        server_conn.close().await.expect("close should succeed");
    }

    #[tokio::test]
    async fn test_corrupt_message_then_close() {
        let (mut transport, addr) = listener().await;
        let server = tokio::spawn(async move { transport.accept().await.expect("should accept") });

        let (mut raw, _) = tokio_tungstenite::connect_async(format!("ws://{addr}"))
            .await
            .expect("client should connect");
        let server_conn = server.await.unwrap();

        let mut bytes = Frame::new(0xB2, vec![0, 4]).to_bytes().unwrap().to_vec();
        bytes[7] = 5;
        raw.send(Message::Binary(bytes.into())).await.unwrap();
        raw.send(Message::Close(None)).await.unwrap();

        let err = server_conn.recv_frame().await.unwrap_err();
        assert!(matches!(err, TransportError::Checksum { .. }));
        assert!(server_conn.recv_frame().await.expect("clean close").is_none());

        // Drain the close handshake on the client side.
        while let Some(Ok(_)) = raw.next().await {}
    }
}
