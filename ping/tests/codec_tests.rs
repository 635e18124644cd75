//! Wire-format tests through the public codec API

mod common;

use common::{echo_reply_for, with_ip_header};
use pingwire::{
    checksum, strip_ip_header, verify_checksum, write_checksum_le, DecodeOptions, EchoBody,
    IcmpMessage, MessageBody, PingError,
};

#[test]
fn test_neu_spider_scenario() {
    let mut request = IcmpMessage::echo_request(1, 1, "Neu Spider");
    let wire = request.marshal().unwrap();

    assert_eq!(wire.len(), 18);
    assert_ne!(request.checksum, 0);

    let mut decoded = IcmpMessage::default();
    decoded.unmarshal(&wire).unwrap();
    let echo = decoded.echo().unwrap();
    assert_eq!(echo.identifier, 1);
    assert_eq!(echo.sequence, 1);
    assert_eq!(echo.data, b"Neu Spider");
}

#[test]
fn test_checksum_self_inverts_for_all_lengths() {
    for len in 0..64usize {
        let data: Vec<u8> = (0..len).map(|i| (i * 37 + 11) as u8).collect();
        let mut msg = IcmpMessage::echo_request(0xA5A5, len as u16, data);
        let wire = msg.marshal().unwrap();

        assert!(verify_checksum(&wire), "payload length {}", len);
    }
}

#[test]
fn test_manual_checksum_placement() {
    let mut wire = vec![8u8, 0, 0, 0, 0x12, 0x34, 0x00, 0x2A, 0xDE, 0xAD, 0xBE];
    let sum = checksum(&wire);
    write_checksum_le(&mut wire, sum);

    assert_eq!(checksum(&wire), 0);
    let mut msg = IcmpMessage::echo_request(0x1234, 42, vec![0xDEu8, 0xAD, 0xBE]);
    assert_eq!(msg.marshal().unwrap(), wire);
}

#[test]
fn test_round_trip_normalizing_checksum() {
    let mut original = IcmpMessage::echo_request(0xCAFE, 0xBABE, vec![0u8; 7]);
    let wire = original.marshal().unwrap();

    let decoded = IcmpMessage::decode(&wire, DecodeOptions::legacy()).unwrap();
    assert_eq!(decoded.icmp_type, original.icmp_type);
    assert_eq!(decoded.code, original.code);
    assert_eq!(decoded.body, original.body);
    assert_eq!(decoded.checksum.swap_bytes(), original.checksum);

    let mut again = decoded.clone();
    assert_eq!(again.marshal().unwrap(), wire);
    assert_eq!(again.checksum, original.checksum);
}

#[test]
fn test_reply_behind_ip_header() {
    let request = IcmpMessage::echo_request(7, 3, "payload").marshal().unwrap();
    let datagram = with_ip_header(&echo_reply_for(&request));
    assert_eq!(datagram[0], 0x45);

    let icmp = strip_ip_header(&datagram);
    assert_eq!(icmp.len(), datagram.len() - 20);

    let reply = IcmpMessage::decode(icmp, DecodeOptions::strict()).unwrap();
    assert_eq!(reply.icmp_type, 0);
    assert_eq!(reply.payload(), b"payload");
}

#[test]
fn test_echo_body_boundaries() {
    let mut body = EchoBody::default();
    body.unmarshal(&[0xFF, 0xFE, 0x00, 0x01]).unwrap();
    assert_eq!((body.identifier, body.sequence), (0xFFFE, 1));
    assert!(body.data.is_empty());

    let err = body.unmarshal(&[0xFF, 0xFE, 0x00]).unwrap_err();
    assert!(matches!(err, PingError::Decode { len: 3 }));
}
