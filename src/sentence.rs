use std::fmt;

use bit_struct::u3;
use either::Either;

use crate::error::{Error, Result};

/// Maximum armored payload characters per sentence fragment.
pub const MAX_PAYLOAD_CHARS: usize = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Talker {
    Aivdm,
    Aivdo,
}

impl fmt::Display for Talker {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Talker::Aivdm => write!(fmt, "AIVDM"),
            Talker::Aivdo => write!(fmt, "AIVDO"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    A,
    B,
}

impl fmt::Display for Channel {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Channel::A => write!(fmt, "A"),
            Channel::B => write!(fmt, "B"),
        }
    }
}

/// One framed `!AIVDM`/`!AIVDO` sentence.
#[derive(Debug, Clone)]
pub struct NmeaSentence {
    pub talker: Talker,
    pub fragment_count: u8,
    pub fragment_index: u8,
    pub group_id: Option<u8>,
    pub channel: Channel,
    pub payload: String,
    pub fill_bits: u3,
}

// Structural fields before range validation.
struct RawSentence<'a> {
    talker: Talker,
    fragment_count: u8,
    fragment_index: u8,
    group_id: Option<u8>,
    channel: char,
    payload: &'a str,
    fill_bits: u8,
}

impl NmeaSentence {
    pub fn parse(line: &str) -> Result<Self> {
        use winnow::Parser;

        let line = line.trim_end();
        verify_checksum(line)?;
        let raw = RawSentence::parse_inner
            .parse(line)
            .map_err(|e| Error::BadFormat(format!("\n{e}")))?;
        raw.validate()
    }
}

impl<'a> RawSentence<'a> {
    fn parse_inner(s: &mut &'a str) -> winnow::Result<Self> {
        use winnow::{
            Parser,
            ascii::digit1,
            combinator::{alt, dispatch, empty, fail, terminated},
            error::StrContext,
            token::{one_of, take, take_while},
        };
        '!'.parse_next(s)?;
        let talker = dispatch!(take(5usize);
            "AIVDM" => empty.value(Talker::Aivdm),
            "AIVDO" => empty.value(Talker::Aivdo),
            _ => fail::<_, Talker, _>,
        )
        .context(StrContext::Label("talker"))
        .parse_next(s)?;
        ','.parse_next(s)?;
        let fragment_count: u8 = terminated(digit1, ',')
            .parse_to()
            .context(StrContext::Label("fragment_count"))
            .parse_next(s)?;
        let fragment_index: u8 = terminated(digit1, ',')
            .parse_to()
            .context(StrContext::Label("fragment_index"))
            .parse_next(s)?;
        let group_id: Option<u8> =
            terminated(alt((digit1.parse_to().map(Some), empty.value(None))), ',')
                .context(StrContext::Label("group_id"))
                .parse_next(s)?;
        let channel = terminated(one_of(('0'..='9', 'A'..='Z')), ',')
            .context(StrContext::Label("channel"))
            .parse_next(s)?;
        let payload = terminated(take_while(1.., ('0'..='W', '`'..='w')), ',')
            .context(StrContext::Label("payload"))
            .parse_next(s)?;
        let fill_bits: char = terminated(one_of('0'..='9'), '*')
            .context(StrContext::Label("fill_bits"))
            .parse_next(s)?;
        let _checksum = take(2usize)
            .try_map(|s| u8::from_str_radix(s, 16))
            .context(StrContext::Label("checksum"))
            .parse_next(s)?;
        Ok(RawSentence {
            talker,
            fragment_count,
            fragment_index,
            group_id,
            channel,
            payload,
            fill_bits: fill_bits as u8 - b'0',
        })
    }

    fn validate(self) -> Result<NmeaSentence> {
        if self.fragment_count < 1 || self.fragment_count > 9 {
            return Err(Error::BadFragment(format!(
                "fragment count {} outside 1..=9",
                self.fragment_count
            )));
        }
        if self.fragment_index < 1 || self.fragment_index > self.fragment_count {
            return Err(Error::BadFragment(format!(
                "fragment index {} outside 1..={}",
                self.fragment_index, self.fragment_count
            )));
        }
        let channel = match self.channel {
            'A' => Channel::A,
            'B' => Channel::B,
            other => {
                return Err(Error::BadFragment(format!("invalid channel {other:?}")));
            }
        };
        let Some(fill_bits) = u3::new(self.fill_bits).filter(|f| f.value() <= 5) else {
            return Err(Error::BadFragment(format!(
                "fill bits {} outside 0..=5",
                self.fill_bits
            )));
        };
        Ok(NmeaSentence {
            talker: self.talker,
            fragment_count: self.fragment_count,
            fragment_index: self.fragment_index,
            group_id: self.group_id,
            channel,
            payload: self.payload.to_owned(),
            fill_bits,
        })
    }
}

impl fmt::Display for NmeaSentence {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        // !AIVDM,1,1,,B,177KQJ5000G?tO`K>RA1wUbN0TKH,0*5C
        let group_id = match self.group_id {
            None => Either::Left(""),
            Some(id) => Either::Right(id),
        };
        let body = format!(
            "{},{},{},{},{},{},{}",
            self.talker,
            self.fragment_count,
            self.fragment_index,
            group_id,
            self.channel,
            self.payload,
            self.fill_bits.value(),
        );
        write!(fmt, "!{body}*{:02X}", checksum(&body))
    }
}

/// XOR of every character strictly between the leading `!`/`$` and the `*`
/// (or the end of the string when no `*` is present).
pub fn checksum(sentence: &str) -> u8 {
    let bytes = sentence.as_bytes();
    let start = usize::from(matches!(bytes.first(), Some(b'!' | b'$')));
    let end = sentence.find('*').unwrap_or(sentence.len());
    bytes[start..end].iter().fold(0, |acc, &b| acc ^ b)
}

/// Validate the two-digit hex checksum that trails the `*`.
pub fn verify_checksum(sentence: &str) -> Result<()> {
    let Some(star) = sentence.find('*') else {
        return Err(Error::BadChecksum("missing '*' delimiter".to_owned()));
    };
    let digits = &sentence[star + 1..];
    if digits.len() < 2 {
        return Err(Error::BadChecksum("truncated checksum".to_owned()));
    }
    let expected = u8::from_str_radix(&digits[..2], 16)
        .map_err(|_| Error::BadChecksum(format!("malformed checksum {:?}", &digits[..2])))?;
    let computed = checksum(&sentence[..star]);
    if computed != expected {
        return Err(Error::BadChecksum(format!(
            "expected {expected:02X}, computed {computed:02X}"
        )));
    }
    Ok(())
}

/// Split a complete armored payload into transmit-ready sentences,
/// attaching `fill_bits` to the final fragment only. Multi-fragment output
/// carries group id 1 on channel A.
pub fn to_sentences(payload: &str, fill_bits: u3) -> Result<Vec<NmeaSentence>> {
    let chunks: Vec<&str> = payload
        .as_bytes()
        .chunks(MAX_PAYLOAD_CHARS)
        .map(|c| std::str::from_utf8(c).expect("armored payload is ASCII"))
        .collect();
    if chunks.len() > 9 {
        return Err(Error::BadFragment(format!(
            "payload of {} characters needs {} fragments, limit is 9",
            payload.len(),
            chunks.len()
        )));
    }
    let fragment_count = chunks.len() as u8;
    let group_id = (fragment_count > 1).then_some(1);
    Ok(chunks
        .iter()
        .enumerate()
        .map(|(i, chunk)| NmeaSentence {
            talker: Talker::Aivdm,
            fragment_count,
            fragment_index: i as u8 + 1,
            group_id,
            channel: Channel::A,
            payload: (*chunk).to_owned(),
            fill_bits: if i + 1 == chunks.len() {
                fill_bits
            } else {
                u3::new(0).expect("0 fits in u3")
            },
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_1() {
        NmeaSentence::parse("!AIVDM,1,1,,A,13HOI:0P0000VOHLCnHQKwvL05Ip,0*23").unwrap();
    }

    #[test]
    fn parse_fields() {
        let sentence =
            NmeaSentence::parse("!AIVDM,2,1,1,B,53cjbg00?ImDTs;;;J0l4Tr22222222222222209000,0*51")
                .unwrap();
        assert_eq!(sentence.talker, Talker::Aivdm);
        assert_eq!(sentence.fragment_count, 2);
        assert_eq!(sentence.fragment_index, 1);
        assert_eq!(sentence.group_id, Some(1));
        assert_eq!(sentence.channel, Channel::B);
        assert_eq!(sentence.fill_bits.value(), 0);
    }

    #[test]
    fn parse_rejects_bad_checksum() {
        let err =
            NmeaSentence::parse("!AIVDM,1,1,,A,13HOI:0P0000VOHLCnHQKwvL05Ip,0*24").unwrap_err();
        assert!(matches!(err, Error::BadChecksum(_)));
        let err = NmeaSentence::parse("!AIVDM,1,1,,A,13HOI:0P0000VOHLCnHQKwvL05Ip,0").unwrap_err();
        assert!(matches!(err, Error::BadChecksum(_)));
    }

    #[test]
    fn parse_rejects_bad_channel_and_fill() {
        // Channel '2' is structurally fine but semantically out of range.
        let err = NmeaSentence::parse("!AIVDM,1,1,,2,601uEP19bi7P04810,6*5D").unwrap_err();
        assert!(matches!(err, Error::BadFragment(_)));

        let body = "AIVDM,1,1,,A,601uEP19bi7P04810,6";
        let line = format!("!{body}*{:02X}", checksum(body));
        let err = NmeaSentence::parse(&line).unwrap_err();
        assert!(matches!(err, Error::BadFragment(_)));
    }

    #[test]
    fn parse_rejects_bad_fragment_numbers() {
        let body = "AIVDM,2,3,1,A,13HOI:0P0000VOHLCnHQKwvL05Ip,0";
        let line = format!("!{body}*{:02X}", checksum(body));
        assert!(matches!(
            NmeaSentence::parse(&line).unwrap_err(),
            Error::BadFragment(_)
        ));
    }

    #[test]
    fn parse_rejects_wrong_formatter() {
        let body = "$GPGGA,1,1,,A,13HOI:0P0000VOHLCnHQKwvL05Ip,0";
        let line = format!("{body}*{:02X}", checksum(body));
        assert!(NmeaSentence::parse(&line).is_err());
    }

    #[test]
    fn display_roundtrip() {
        for line in [
            "!AIVDM,1,1,,A,13HOI:0P0000VOHLCnHQKwvL05Ip,0*23",
            "!AIVDM,2,1,1,B,53cjbg00?ImDTs;;;J0l4Tr22222222222222209000,0*51",
        ] {
            let sentence = NmeaSentence::parse(line).unwrap();
            assert_eq!(sentence.to_string(), line);
        }
    }

    #[test]
    fn display_aivdo() {
        let body = "AIVDO,1,1,,B,177KQJ5000G?tO`K>RA1wUbN0TKH,0";
        let line = format!("!{body}*{:02X}", checksum(body));
        let sentence = NmeaSentence::parse(&line).unwrap();
        assert_eq!(sentence.talker, Talker::Aivdo);
        assert_eq!(sentence.to_string(), line);
    }

    #[test]
    fn checksum_span() {
        assert_eq!(
            checksum("!AIVDM,1,1,,A,13HOI:0P0000VOHLCnHQKwvL05Ip,0"),
            0x23
        );
        // The fold ignores everything from '*' on.
        assert_eq!(
            checksum("!AIVDM,1,1,,A,13HOI:0P0000VOHLCnHQKwvL05Ip,0*FF"),
            0x23
        );
    }

    #[test]
    fn split_payload_into_fragments() {
        let payload = "0".repeat(130);
        let fragments = to_sentences(&payload, u3::new(2).unwrap()).unwrap();
        assert_eq!(fragments.len(), 3);
        assert_eq!(fragments[0].payload.len(), 60);
        assert_eq!(fragments[2].payload.len(), 10);
        assert_eq!(fragments[0].fill_bits.value(), 0);
        assert_eq!(fragments[2].fill_bits.value(), 2);
        assert!(fragments.iter().all(|f| f.group_id == Some(1)));
        assert_eq!(fragments[1].fragment_index, 2);

        let single = to_sentences("13HOI", u3::new(0).unwrap()).unwrap();
        assert_eq!(single.len(), 1);
        assert_eq!(single[0].group_id, None);
    }
}
