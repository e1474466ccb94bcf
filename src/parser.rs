use std::time::Duration;

use crate::assembler::{DEFAULT_MAX_GROUPS, DEFAULT_TIMEOUT, FragmentAssembler};
use crate::error::{Error, Result};
use crate::factory::{MessageDecoder, MessageFactory};
use crate::messages::AisMessage;
use crate::sentence::NmeaSentence;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserConfig {
    /// How long an incomplete fragment group may sit before
    /// [`Parser::sweep_expired`] drops it.
    pub message_timeout: Duration,
    /// Upper bound on concurrently buffered fragment groups.
    pub max_groups: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            message_timeout: DEFAULT_TIMEOUT,
            max_groups: DEFAULT_MAX_GROUPS,
        }
    }
}

/// Facade over sentence framing, fragment reassembly and message decode.
///
/// Feed raw lines to [`parse`](Self::parse): complete messages come back as
/// `Ok(Some(..))`, fragments still waiting for their group as `Ok(None)`.
/// The most recent failure stays readable through
/// [`last_error`](Self::last_error) until the next successful call.
pub struct Parser {
    assembler: FragmentAssembler,
    factory: MessageFactory,
    last_error: Option<Error>,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    pub fn new() -> Self {
        Self::with_config(ParserConfig::default())
    }

    pub fn with_config(config: ParserConfig) -> Self {
        Self {
            assembler: FragmentAssembler::new(config.message_timeout, config.max_groups),
            factory: MessageFactory::builtin(),
            last_error: None,
        }
    }

    /// Install (or replace) the decoder for a message type on this parser.
    pub fn register_decoder(&mut self, message_type: u8, decoder: MessageDecoder) {
        self.factory.register(message_type, decoder);
    }

    pub fn parse(&mut self, line: &str) -> Result<Option<AisMessage>> {
        let result = self.parse_inner(line);
        self.last_error = result.as_ref().err().cloned();
        result
    }

    fn parse_inner(&mut self, line: &str) -> Result<Option<AisMessage>> {
        let sentence = NmeaSentence::parse(line)?;
        let bits = self.assembler.offer(
            sentence.fragment_index,
            sentence.fragment_count,
            sentence.group_id,
            sentence.channel,
            &sentence.payload,
            sentence.fill_bits.value(),
        )?;
        match bits {
            Some(bits) => self.factory.decode(&bits).map(Some),
            None => Ok(None),
        }
    }

    /// The error of the most recent `parse` call, if it failed.
    pub fn last_error(&self) -> Option<&Error> {
        self.last_error.as_ref()
    }

    /// Number of fragment groups still waiting for their remaining parts.
    pub fn incomplete_count(&self) -> usize {
        self.assembler.len()
    }

    /// Drop fragment groups older than the configured timeout.
    pub fn sweep_expired(&mut self) {
        self.assembler.sweep_expired();
    }

    /// Forget all buffered fragments.
    pub fn clear_incomplete(&mut self) {
        self.assembler.clear();
    }

    pub fn set_message_timeout(&mut self, timeout: Duration) {
        self.assembler.set_timeout(timeout);
    }

    pub fn set_max_groups(&mut self, max_groups: usize) {
        self.assembler.set_max_groups(max_groups);
    }
}

/// One-shot convenience parse of a single self-contained sentence.
pub fn parse_ais(line: &str) -> Result<Option<AisMessage>> {
    Parser::new().parse(line)
}
