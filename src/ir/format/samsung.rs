use cached::proc_macro::cached;

use crate::ir::types::{IrEncodeError, IrFormat, IrPulse, IrSequence};

pub const SECTION_LENGTH: usize = 7;

const HEADER_MARK: u128 = 690;
const HEADER_SPACE: u128 = 17844;
const SECTION_MARK: u128 = 3086;
const SECTION_SPACE: u128 = 8864;
const SECTION_GAP: u128 = 2886;
const BIT_MARK: u128 = 586;
const ONE_SPACE: u128 = 1432;
const ZERO_SPACE: u128 = 436;
const MESSAGE_GAP: u128 = 100_000;

pub struct Samsung {}

impl IrFormat for Samsung {
    fn encode<T: AsRef<[u8]>>(bytes: T) -> Result<IrSequence, IrEncodeError> {
        let bytes = bytes.as_ref();
        if bytes.is_empty() {
            return Err(IrEncodeError::EmptyFrame);
        }
        if bytes.len() % SECTION_LENGTH != 0 {
            return Err(IrEncodeError::PartialSection(bytes.len()));
        }
        Ok(section_pulses(bytes.to_vec()))
    }
}

#[cached(size = 16)]
fn section_pulses(bytes: Vec<u8>) -> IrSequence {
    let sections = bytes.len() / SECTION_LENGTH;
    let mut code = Vec::with_capacity(2 + sections * (4 + SECTION_LENGTH * 16));

    // header
    code.push(HEADER_MARK);
    code.push(HEADER_SPACE);

    for (i, section) in bytes.chunks(SECTION_LENGTH).enumerate() {
        // leader
        code.push(SECTION_MARK);
        code.push(SECTION_SPACE);

        // data, least significant bit first
        for byte in section {
            let mut bits = *byte;
            for _ in 0..8 {
                code.push(BIT_MARK);
                if (bits & 1) == 0 {
                    code.push(ZERO_SPACE);
                } else {
                    code.push(ONE_SPACE);
                }
                bits >>= 1;
            }
        }

        // footer
        code.push(BIT_MARK);
        code.push(if i + 1 == sections {
            MESSAGE_GAP
        } else {
            SECTION_GAP
        });
    }

    IrSequence(code.into_iter().map(IrPulse).collect())
}
