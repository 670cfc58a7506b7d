use std::io::Write;

use log::error;

use crate::huffman_coding::huffman_codes::Code;

/// Creates a bitstream for output. Bits are packed most significant bit first.
pub struct BitPacker {
    pub output: Vec<u8>,
    /// Number of data bits in the final byte after flush() (0 means the byte was full).
    pub last_bits: u8,
    queue: u64,
    q_bits: u8,
    /// Bytes already handed to a writer by drain_to().
    drained: u64,
}

impl BitPacker {
    /// Create a new BitPacker with an output buffer of size specified. Call flush() to
    /// flush the bit queue to the buffer before writing out the last of the data.
    pub fn new(size: usize) -> Self {
        Self {
            output: Vec::with_capacity(size),
            last_bits: 0,
            queue: 0,
            q_bits: 0,
            drained: 0,
        }
    }

    /// Internal bitstream write function common to all out.XX functions.
    fn write_stream(&mut self) {
        while self.q_bits > 7 {
            let byte = (self.queue >> (self.q_bits - 8)) as u8;
            self.output.push(byte); //push the packed byte out
            self.q_bits -= 8; //adjust the count of bits left in the queue
        }
    }

    /// Puts the low `len` bits (0-32) of `data` on the stream.
    pub fn out(&mut self, data: u32, len: u8) {
        if len == 0 {
            return;
        }
        let mask = u64::MAX >> (64 - len as u32);
        self.queue <<= len; //shift queue by bit length
        self.queue |= data as u64 & mask; //add data portion to queue
        self.q_bits += len; //update depth of queue bits
        self.write_stream();
    }

    /// Puts a huffman code on the stream. Codes over 32 bits go out in two pieces so the
    /// queue never holds more than 39 bits.
    pub fn out_code(&mut self, code: &Code) {
        if code.len > 32 {
            self.out((code.bits >> 32) as u32, code.len - 32);
            self.out(code.bits as u32, 32);
        } else {
            self.out(code.bits as u32, code.len);
        }
    }

    /// Puts a 32 bit word of pre-packed binary encoded data on the stream.
    pub fn out32(&mut self, data: u32) {
        self.queue <<= 32; //shift queue by bit length
        self.queue |= data as u64; //add data portion to queue
        self.q_bits += 32; //update depth of queue bits
        self.write_stream();
    }

    /// Puts a 16 bit word of pre-packed binary encoded data on the stream.
    pub fn out16(&mut self, data: u16) {
        self.queue <<= 16; //shift queue by bit length
        self.queue |= data as u64; //add data portion to queue
        self.q_bits += 16; //update depth of queue bits
        self.write_stream();
    }

    /// Flushes the remaining bits (1-7) from the buffer, padding with 0s in the least
    /// signficant bits
    pub fn flush(&mut self) {
        self.last_bits = self.q_bits % 8;
        if self.q_bits > 0 {
            self.queue <<= 8 - self.q_bits; //pad the queue with zeros
            self.q_bits += 8 - self.q_bits;
            self.write_stream(); // write out all that is left
            if self.q_bits > 0 {
                error!("Stuff left in the BitPacker queue at {}.", self.loc());
            }
        }
    }

    /// Write every complete byte packed so far to `writer` and empty the output buffer.
    /// Bits still waiting in the queue stay there.
    pub fn drain_to<W: Write>(&mut self, writer: &mut W) -> std::io::Result<()> {
        writer.write_all(&self.output)?;
        self.drained += self.output.len() as u64;
        self.output.clear();
        Ok(())
    }

    /// Total bytes produced so far, drained or not.
    pub fn bytes_out(&self) -> u64 {
        self.drained + self.output.len() as u64
    }

    /// Number of bytes.bits output so far, for diagnostics.
    pub fn loc(&self) -> String {
        let bits = self.bytes_out() * 8 + self.q_bits as u64;
        format!("[{}.{}]", bits / 8, bits % 8)
    }
}
