//! End-to-end multipart scenarios: encode a long message into sentences,
//! feed them back through a `Parser` in various orders and under various
//! assembler configurations.

use std::time::Duration;

use aivdm::{
    AisMessage, ApplicationPayload, AreaNotice, Error, NmeaSentence, Parser, ParserConfig, SubArea,
    StaticAndVoyageData,
};

fn sample_static_data() -> StaticAndVoyageData {
    let mut data = StaticAndVoyageData::new(123456789, 0);
    data.set_imo_number(9876543);
    data.set_call_sign("TEST123");
    data.set_vessel_name("MULTI PART TEST SHIP");
    data.set_ship_type(70);
    data.set_ship_dimensions(100, 50, 10, 15);
    data.set_epfd_type(1);
    data.set_eta(5, 15, 14, 30);
    data.set_draught(5.0);
    data.set_destination("PORT OF MULTIPART");
    data
}

/// Two sentences carrying one type 5 message, optionally re-tagged with a
/// different group id.
fn multipart_sentences(group_id: u8) -> Vec<String> {
    let message = AisMessage::StaticAndVoyageData(sample_static_data());
    let sentences = message.encode_to_nmea().unwrap();
    assert_eq!(sentences.len(), 2, "a 424-bit message spans two sentences");
    sentences
        .iter()
        .map(|line| {
            let mut sentence = NmeaSentence::parse(line).unwrap();
            sentence.group_id = Some(group_id);
            sentence.to_string()
        })
        .collect()
}

fn assert_sample(message: &AisMessage) {
    assert_eq!(message.message_type(), 5);
    assert_eq!(message.mmsi(), 123456789);
    let AisMessage::StaticAndVoyageData(data) = message else {
        panic!("expected static and voyage data");
    };
    assert_eq!(data.vessel_name(), "MULTI PART TEST SHIP");
    assert_eq!(data.call_sign(), "TEST123");
    assert_eq!(data.destination(), "PORT OF MULTIPART");
    assert_eq!(data.imo_number(), 9876543);
}

#[test]
fn two_fragments_in_order() {
    let sentences = multipart_sentences(1);
    let mut parser = Parser::new();

    assert!(parser.parse(&sentences[0]).unwrap().is_none());
    assert_eq!(parser.incomplete_count(), 1);

    let message = parser.parse(&sentences[1]).unwrap().unwrap();
    assert_eq!(parser.incomplete_count(), 0);
    assert_sample(&message);
}

#[test]
fn two_fragments_out_of_order() {
    let sentences = multipart_sentences(1);
    let mut parser = Parser::new();

    assert!(parser.parse(&sentences[1]).unwrap().is_none());
    let message = parser.parse(&sentences[0]).unwrap().unwrap();
    assert_eq!(parser.incomplete_count(), 0);
    assert_sample(&message);
}

#[test]
fn interleaved_groups_complete_independently() {
    let first = multipart_sentences(1);
    let second = multipart_sentences(2);
    let mut parser = Parser::new();

    assert!(parser.parse(&first[0]).unwrap().is_none());
    assert!(parser.parse(&second[0]).unwrap().is_none());
    assert_eq!(parser.incomplete_count(), 2);

    let message = parser.parse(&first[1]).unwrap().unwrap();
    assert_sample(&message);
    assert_eq!(parser.incomplete_count(), 1);

    let message = parser.parse(&second[1]).unwrap().unwrap();
    assert_sample(&message);
    assert_eq!(parser.incomplete_count(), 0);
}

#[test]
fn duplicate_fragment_does_not_disturb_the_group() {
    let sentences = multipart_sentences(1);
    let mut parser = Parser::new();

    assert!(parser.parse(&sentences[0]).unwrap().is_none());
    assert!(parser.parse(&sentences[0]).unwrap().is_none());
    assert_eq!(parser.incomplete_count(), 1);

    let message = parser.parse(&sentences[1]).unwrap().unwrap();
    assert_sample(&message);
}

#[test]
fn timeout_evicts_incomplete_group() {
    let sentences = multipart_sentences(1);
    let mut parser = Parser::with_config(ParserConfig {
        message_timeout: Duration::from_millis(50),
        max_groups: 100,
    });

    assert!(parser.parse(&sentences[0]).unwrap().is_none());
    assert_eq!(parser.incomplete_count(), 1);

    std::thread::sleep(Duration::from_millis(120));
    parser.sweep_expired();
    assert_eq!(parser.incomplete_count(), 0);

    // The second fragment alone only opens a fresh group.
    assert!(parser.parse(&sentences[1]).unwrap().is_none());
    assert_eq!(parser.incomplete_count(), 1);
}

#[test]
fn capacity_bound_drops_earliest_group() {
    let mut parser = Parser::with_config(ParserConfig {
        message_timeout: Duration::from_secs(60),
        max_groups: 3,
    });

    for group_id in 1..=4 {
        let sentences = multipart_sentences(group_id);
        assert!(parser.parse(&sentences[0]).unwrap().is_none());
        std::thread::sleep(Duration::from_millis(2));
    }
    assert_eq!(parser.incomplete_count(), 3);

    // Group 1 is gone; its second fragment re-opens a group instead of
    // completing one.
    let sentences = multipart_sentences(1);
    assert!(parser.parse(&sentences[1]).unwrap().is_none());

    // Group 2 survived and completes.
    let sentences = multipart_sentences(2);
    let message = parser.parse(&sentences[1]).unwrap().unwrap();
    assert_sample(&message);
}

#[test]
fn clearing_incomplete_groups() {
    let sentences = multipart_sentences(1);
    let mut parser = Parser::new();
    assert!(parser.parse(&sentences[0]).unwrap().is_none());
    assert_eq!(parser.incomplete_count(), 1);
    parser.clear_incomplete();
    assert_eq!(parser.incomplete_count(), 0);
}

#[test]
fn bad_checksum_cannot_poison_a_group() {
    let sentences = multipart_sentences(1);
    let mut parser = Parser::new();
    assert!(parser.parse(&sentences[0]).unwrap().is_none());

    // Corrupt the second fragment's checksum.
    let mut corrupted = sentences[1].clone();
    let last = corrupted.pop().unwrap();
    corrupted.push(if last == '0' { '1' } else { '0' });
    assert!(matches!(
        parser.parse(&corrupted).unwrap_err(),
        Error::BadChecksum(_)
    ));
    assert_eq!(parser.incomplete_count(), 1);

    // The intact fragment still completes the group.
    let message = parser.parse(&sentences[1]).unwrap().unwrap();
    assert_sample(&message);
}

#[test]
fn multipart_broadcast_with_area_notice_payload() {
    let notice = AreaNotice::new(
        1,
        20,
        7,
        14,
        10,
        30,
        120,
        vec![
            SubArea::circle(-122.41, 37.77, 500),
            SubArea::circle(-122.42, 37.78, 600),
            SubArea::circle(-122.43, 37.79, 700),
            SubArea::circle(-122.44, 37.80, 800),
        ],
    );
    let envelope = notice.to_broadcast_message(366999999, 0).unwrap();
    let message = AisMessage::BinaryBroadcast(envelope);
    let sentences = message.encode_to_nmea().unwrap();
    assert!(sentences.len() > 1);

    let mut parser = Parser::new();
    let mut decoded = None;
    for sentence in &sentences {
        decoded = parser.parse(sentence).unwrap();
    }
    let decoded = decoded.expect("last fragment completes the message");
    assert_eq!(decoded, message);

    let AisMessage::BinaryBroadcast(envelope) = &decoded else {
        panic!("expected a binary broadcast");
    };
    let Some(ApplicationPayload::AreaNotice(decoded_notice)) =
        envelope.application_payload().unwrap()
    else {
        panic!("expected an area notice payload");
    };
    assert_eq!(decoded_notice, notice);
}
