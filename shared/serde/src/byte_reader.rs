use crate::error::SerdeErr;

/// How many nested compound values a reader accepts.
pub const MAX_NESTING_DEPTH: usize = 128;

/// A read cursor over a received byte payload.
pub struct ByteReader<'b> {
    buffer: &'b [u8],
    position: usize,
    depth: usize,
}

impl<'b> ByteReader<'b> {
    pub fn new(buffer: &'b [u8]) -> Self {
        Self {
            buffer,
            position: 0,
            depth: 0,
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.position
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    pub fn read_byte(&mut self) -> Result<u8, SerdeErr> {
        let Some(byte) = self.buffer.get(self.position) else {
            return Err(SerdeErr::BufferExhausted {
                needed: 1,
                remaining: 0,
            });
        };
        self.position += 1;
        Ok(*byte)
    }

    pub fn read_bytes(&mut self, length: usize) -> Result<&'b [u8], SerdeErr> {
        let remaining = self.remaining();
        if length > remaining {
            return Err(SerdeErr::BufferExhausted {
                needed: length,
                remaining,
            });
        }
        let start = self.position;
        self.position += length;
        Ok(&self.buffer[start..self.position])
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], SerdeErr> {
        let slice = self.read_bytes(N)?;
        let mut output = [0u8; N];
        output.copy_from_slice(slice);
        Ok(output)
    }

    /// Reads an `int32` length/count prefix, rejecting negative values.
    pub fn read_length(&mut self) -> Result<usize, SerdeErr> {
        let length = i32::from_le_bytes(self.read_array::<4>()?);
        if length < 0 {
            return Err(SerdeErr::NegativeLength { length });
        }
        Ok(length as usize)
    }

    /// Runs `read` one nesting level deeper, failing once the reader is
    /// [`MAX_NESTING_DEPTH`] levels down.
    pub fn nested<T>(
        &mut self,
        read: impl FnOnce(&mut Self) -> Result<T, SerdeErr>,
    ) -> Result<T, SerdeErr> {
        self.enter_nested()?;
        let output = read(self);
        self.exit_nested();
        output
    }

    fn enter_nested(&mut self) -> Result<(), SerdeErr> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(SerdeErr::NestingTooDeep {
                limit: MAX_NESTING_DEPTH,
            });
        }
        self.depth += 1;
        Ok(())
    }

    fn exit_nested(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_past_end_reports_remaining() {
        let data = [1u8, 2, 3];
        let mut reader = ByteReader::new(&data);

        assert_eq!(reader.read_bytes(2).unwrap(), &[1, 2]);
        let err = reader.read_bytes(2).unwrap_err();
        assert_eq!(
            err,
            SerdeErr::BufferExhausted {
                needed: 2,
                remaining: 1
            }
        );
        // cursor does not advance on failure
        assert_eq!(reader.position(), 2);
        assert_eq!(reader.read_byte().unwrap(), 3);
        assert!(reader.is_empty());
    }

    #[test]
    fn negative_length_prefix_is_rejected() {
        let data = (-5i32).to_le_bytes();
        let mut reader = ByteReader::new(&data);
        assert_eq!(
            reader.read_length().unwrap_err(),
            SerdeErr::NegativeLength { length: -5 }
        );
    }

    #[test]
    fn nesting_is_bounded() {
        let mut reader = ByteReader::new(&[]);
        for _ in 0..MAX_NESTING_DEPTH {
            reader.enter_nested().unwrap();
        }
        assert_eq!(
            reader.enter_nested(),
            Err(SerdeErr::NestingTooDeep {
                limit: MAX_NESTING_DEPTH
            })
        );

        reader.exit_nested();
        assert!(reader.enter_nested().is_ok());
    }
}
