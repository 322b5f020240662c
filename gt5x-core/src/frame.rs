//! Incremental frame decoder
//!
//! One state machine recognizes both packet shapes the sensor sends: 12-byte
//! command replies and variable-length data frames. The shapes share their
//! skeleton — sync scan, device ID, payload, checksum — and differ only in
//! payload length and whether the checksum is compared, so both are handled
//! by [`FrameDecoder`] with the payload strategy left to the caller.
//!
//! The decoder is sans-I/O: feed it whatever bytes the transport produced and
//! it hands back how many it consumed plus at most one [`Progress`] event.
//! Framing errors are never surfaced; a bad device ID or checksum silently
//! drops the decoder back into sync scanning, which is also its initial state.

use tracing::trace;

use crate::checksum::Checksum;
use crate::constants::{DEVICE_ID, REPLY_PAYLOAD_LEN, REPLY_SYNC};

/// Decode states, in wire order. `Sync` is the restart target for every
/// framing error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Sync,
    DeviceId,
    Payload,
    ChecksumField,
}

/// Outcome of one [`FrameDecoder::advance`] call.
#[derive(Debug, PartialEq, Eq)]
pub enum Progress<'a> {
    /// Input exhausted without completing a frame; feed more bytes.
    Incomplete,

    /// A run of payload bytes, borrowed from the input slice. The caller
    /// copies or forwards it before the next `advance` call.
    Payload(&'a [u8]),

    /// Checksum mismatch after the payload completed. The decoder is back in
    /// sync scanning; any payload already delivered for the aborted frame is
    /// void and accumulation must restart.
    Restarted,

    /// A full frame was assembled and, if verification is enabled, its
    /// checksum matched.
    Complete,
}

/// Byte-incremental decoder for one expected frame.
///
/// Construct one per read operation: [`FrameDecoder::reply`] for a command
/// reply, [`FrameDecoder::data`] for a data frame of a known payload length.
#[derive(Debug)]
pub struct FrameDecoder {
    state: State,
    /// Shift register for sync scanning, big-endian byte order.
    window: u16,
    sync: u16,
    payload_len: usize,
    remaining: usize,
    verify: bool,
    sum: Checksum,
    /// Staging for the two-byte device ID and checksum fields.
    pending: [u8; 2],
    filled: usize,
}

impl FrameDecoder {
    /// Decoder for a 12-byte command reply. Checksum is always verified.
    pub fn reply() -> Self {
        Self::new(REPLY_PAYLOAD_LEN, true)
    }

    /// Decoder for a data frame with a caller-known payload length.
    ///
    /// `verify` is disabled for streaming reads, where payload bytes are
    /// forwarded as they arrive and a failed comparison could not retract
    /// them.
    pub fn data(payload_len: usize, verify: bool) -> Self {
        Self::new(payload_len, verify)
    }

    fn new(payload_len: usize, verify: bool) -> Self {
        Self {
            state: State::Sync,
            window: 0,
            sync: u16::from_be_bytes(REPLY_SYNC),
            payload_len,
            remaining: payload_len,
            verify,
            sum: Checksum::default(),
            pending: [0; 2],
            filled: 0,
        }
    }

    /// Drop back to sync scanning.
    fn resync(&mut self) {
        self.state = State::Sync;
        self.window = 0;
        self.remaining = self.payload_len;
        self.filled = 0;
    }

    /// Consume bytes from `input`, returning how many were used and at most
    /// one event. Call repeatedly until the whole slice is consumed.
    pub fn advance<'a>(&mut self, input: &'a [u8]) -> (usize, Progress<'a>) {
        let mut pos = 0;

        while pos < input.len() {
            match self.state {
                State::Sync => {
                    self.window = (self.window << 8) | input[pos] as u16;
                    pos += 1;

                    if self.window == self.sync {
                        trace!("sync pair found");
                        self.window = 0;
                        self.sum = Checksum::over(&REPLY_SYNC);
                        self.filled = 0;
                        self.state = State::DeviceId;
                    }
                }
                State::DeviceId => {
                    self.pending[self.filled] = input[pos];
                    pos += 1;
                    self.filled += 1;

                    if self.filled == 2 {
                        if u16::from_le_bytes(self.pending) == DEVICE_ID {
                            self.sum.extend(&self.pending);
                            self.filled = 0;
                            self.state = if self.remaining == 0 {
                                State::ChecksumField
                            } else {
                                State::Payload
                            };
                        } else {
                            trace!(
                                devid = %format_args!("0x{:04X}", u16::from_le_bytes(self.pending)),
                                "wrong device id, resyncing"
                            );
                            self.resync();
                        }
                    }
                }
                State::Payload => {
                    let take = self.remaining.min(input.len() - pos);
                    let chunk = &input[pos..pos + take];

                    self.sum.extend(chunk);
                    pos += take;
                    self.remaining -= take;

                    if self.remaining == 0 {
                        self.filled = 0;
                        self.state = State::ChecksumField;
                    }

                    return (pos, Progress::Payload(chunk));
                }
                State::ChecksumField => {
                    self.pending[self.filled] = input[pos];
                    pos += 1;
                    self.filled += 1;

                    if self.filled == 2 {
                        let received = u16::from_le_bytes(self.pending);
                        let computed = self.sum.value();
                        self.resync();

                        if !self.verify || received == computed {
                            return (pos, Progress::Complete);
                        }

                        trace!(
                            received = %format_args!("0x{received:04X}"),
                            computed = %format_args!("0x{computed:04X}"),
                            "checksum mismatch, resyncing"
                        );
                        return (pos, Progress::Restarted);
                    }
                }
            }
        }

        (pos, Progress::Incomplete)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checksum;
    use pretty_assertions::assert_eq;

    /// Build a valid reply frame on the wire.
    fn reply_frame(parameter: u32, code: u16) -> Vec<u8> {
        let mut frame = Vec::with_capacity(12);
        frame.extend_from_slice(&REPLY_SYNC);
        frame.extend_from_slice(&DEVICE_ID.to_le_bytes());
        frame.extend_from_slice(&parameter.to_le_bytes());
        frame.extend_from_slice(&code.to_le_bytes());
        let sum = checksum::sum(&frame);
        frame.extend_from_slice(&sum.to_le_bytes());
        frame
    }

    /// Drive a decoder over a stream, collecting payload and the final event.
    fn run(decoder: &mut FrameDecoder, stream: &[u8]) -> (Vec<u8>, bool) {
        let mut payload = Vec::new();
        let mut pos = 0;
        while pos < stream.len() {
            let (used, progress) = decoder.advance(&stream[pos..]);
            pos += used;
            match progress {
                Progress::Payload(chunk) => payload.extend_from_slice(chunk),
                Progress::Restarted => payload.clear(),
                Progress::Complete => return (payload, true),
                Progress::Incomplete => {}
            }
        }
        (payload, false)
    }

    #[test]
    fn decodes_whole_frame() {
        let frame = reply_frame(0, 0x30);
        let mut decoder = FrameDecoder::reply();
        let (payload, complete) = run(&mut decoder, &frame);

        assert!(complete);
        assert_eq!(payload, &[0x00, 0x00, 0x00, 0x00, 0x30, 0x00]);
    }

    #[test]
    fn decodes_byte_by_byte() {
        let frame = reply_frame(0xAABBCCDD, 0x31);
        let mut decoder = FrameDecoder::reply();
        let mut payload = Vec::new();

        for (i, &b) in frame.iter().enumerate() {
            let byte = [b];
            let (used, progress) = decoder.advance(&byte);
            assert_eq!(used, 1);
            match progress {
                Progress::Payload(chunk) => payload.extend_from_slice(chunk),
                Progress::Complete => assert_eq!(i, frame.len() - 1),
                Progress::Incomplete => assert!(i < frame.len() - 1),
                Progress::Restarted => panic!("unexpected restart"),
            }
        }
        assert_eq!(payload, &frame[4..10]);
    }

    #[test]
    fn skips_leading_garbage() {
        let mut stream = vec![0x00, 0x5A, 0x42, 0xA5, 0xFF];
        stream.extend_from_slice(&reply_frame(7, 0x30));

        let mut decoder = FrameDecoder::reply();
        let (payload, complete) = run(&mut decoder, &stream);

        assert!(complete);
        assert_eq!(payload[..4], 7u32.to_le_bytes());
    }

    #[test]
    fn wrong_device_id_resyncs() {
        let mut bad = reply_frame(7, 0x30);
        bad[2] = 0x02; // device id 0x0002

        let mut stream = bad;
        stream.extend_from_slice(&reply_frame(9, 0x30));

        let mut decoder = FrameDecoder::reply();
        let (payload, complete) = run(&mut decoder, &stream);

        assert!(complete);
        assert_eq!(payload[..4], 9u32.to_le_bytes());
    }

    #[test]
    fn corrupted_byte_never_completes() {
        let frame = reply_frame(0x1234, 0x30);

        // corrupt each byte before the checksum field in turn
        for i in 0..10 {
            let mut bad = frame.clone();
            bad[i] ^= 0x40;

            let mut decoder = FrameDecoder::reply();
            let (_, complete) = run(&mut decoder, &bad);
            assert!(!complete, "corrupting byte {i} still completed");
        }
    }

    #[test]
    fn recovers_after_checksum_mismatch() {
        let mut stream = reply_frame(1, 0x30);
        let n = stream.len();
        stream[n - 1] ^= 0xFF; // break the checksum
        stream.extend_from_slice(&reply_frame(2, 0x30));

        let mut decoder = FrameDecoder::reply();
        let (payload, complete) = run(&mut decoder, &stream);

        assert!(complete);
        assert_eq!(payload[..4], 2u32.to_le_bytes());
    }

    #[test]
    fn data_frame_with_payload() {
        let body: Vec<u8> = (0..100).collect();
        let frame = crate::packet::encode_data_frame(&body);

        let mut decoder = FrameDecoder::data(body.len(), true);
        let (payload, complete) = run(&mut decoder, &frame);

        assert!(complete);
        assert_eq!(payload, body);
    }

    #[test]
    fn data_frame_bad_checksum_restarts() {
        let body = [0x55u8; 16];
        let mut frame = crate::packet::encode_data_frame(&body).to_vec();
        let n = frame.len();
        frame[n - 2] ^= 0x01;

        let mut decoder = FrameDecoder::data(body.len(), true);
        let (payload, complete) = run(&mut decoder, &frame);

        assert!(!complete);
        assert!(payload.is_empty(), "restart must void delivered payload");
    }

    #[test]
    fn unverified_data_frame_completes_despite_bad_checksum() {
        let body = [0xA0u8; 8];
        let mut frame = crate::packet::encode_data_frame(&body).to_vec();
        let n = frame.len();
        frame[n - 2] ^= 0x01;

        let mut decoder = FrameDecoder::data(body.len(), false);
        let (payload, complete) = run(&mut decoder, &frame);

        assert!(complete);
        assert_eq!(payload, body);
    }

    #[test]
    fn empty_payload_data_frame() {
        let frame = crate::packet::encode_data_frame(&[]);

        let mut decoder = FrameDecoder::data(0, true);
        let (payload, complete) = run(&mut decoder, &frame);

        assert!(complete);
        assert!(payload.is_empty());
    }

    #[test]
    fn truncated_header_then_fresh_frame() {
        // One stray sync byte, then a complete frame: the shift register
        // must still lock on.
        let mut stream = vec![0x5A];
        stream.extend_from_slice(&reply_frame(3, 0x30));

        let mut decoder = FrameDecoder::reply();
        let (payload, complete) = run(&mut decoder, &stream);

        assert!(complete);
        assert_eq!(payload[..4], 3u32.to_le_bytes());
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// A valid frame is decoded no matter what garbage precedes it,
            /// as long as the garbage cannot itself open a frame.
            #[test]
            fn garbage_prefix_then_valid_frame(
                prefix in proptest::collection::vec(any::<u8>(), 0..64),
                parameter in any::<u32>(),
            ) {
                // Strip accidental sync pairs from the prefix so the decoder
                // cannot lock onto a phantom frame spanning the boundary.
                let mut cleaned: Vec<u8> = Vec::new();
                for b in prefix {
                    if b != 0x5A && b != 0xA5 {
                        cleaned.push(b);
                    }
                }

                let mut stream = cleaned;
                stream.extend_from_slice(&reply_frame(parameter, 0x30));

                let mut decoder = FrameDecoder::reply();
                let (payload, complete) = run(&mut decoder, &stream);

                prop_assert!(complete);
                prop_assert_eq!(&payload[..4], &parameter.to_le_bytes()[..]);
            }

            /// Arbitrary chunking of the input never changes the result.
            #[test]
            fn chunking_is_irrelevant(
                parameter in any::<u32>(),
                cuts in proptest::collection::vec(1usize..4, 0..12),
            ) {
                let frame = reply_frame(parameter, 0x30);
                let mut decoder = FrameDecoder::reply();
                let mut payload = Vec::new();
                let mut complete = false;

                let mut pos = 0;
                let mut cut_iter = cuts.into_iter();
                while pos < frame.len() {
                    let step = cut_iter.next().unwrap_or(frame.len() - pos)
                        .min(frame.len() - pos);
                    let mut local = 0;
                    while local < step {
                        let (used, progress) =
                            decoder.advance(&frame[pos + local..pos + step]);
                        local += used;
                        match progress {
                            Progress::Payload(chunk) => payload.extend_from_slice(chunk),
                            Progress::Complete => complete = true,
                            _ => {}
                        }
                    }
                    pos += step;
                }

                prop_assert!(complete);
                prop_assert_eq!(&payload[..4], &parameter.to_le_bytes()[..]);
            }
        }
    }
}
