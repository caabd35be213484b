//! SSH wire-format reader (RFC 4251 `uint32` and `string`)

pub(crate) struct WireReader<'a> {
    buf: &'a [u8],
}

impl<'a> WireReader<'a> {
    pub(crate) fn new(buf: &'a [u8]) -> Self {
        Self { buf }
    }

    /// Consume an exact byte prefix
    pub(crate) fn expect(&mut self, prefix: &[u8]) -> Result<(), String> {
        match self.buf.strip_prefix(prefix) {
            Some(rest) => {
                self.buf = rest;
                Ok(())
            }
            None => Err("unexpected header".to_string()),
        }
    }

    pub(crate) fn read_u32(&mut self) -> Result<u32, String> {
        if self.buf.len() < 4 {
            return Err("truncated length field".to_string());
        }
        let (head, rest) = self.buf.split_at(4);
        self.buf = rest;
        Ok(u32::from_be_bytes([head[0], head[1], head[2], head[3]]))
    }

    pub(crate) fn read_string(&mut self) -> Result<&'a [u8], String> {
        let len = self.read_u32()? as usize;
        if self.buf.len() < len {
            return Err(format!(
                "truncated string: need {len} bytes, have {}",
                self.buf.len()
            ));
        }
        let (head, rest) = self.buf.split_at(len);
        self.buf = rest;
        Ok(head)
    }

    pub(crate) fn read_utf8(&mut self) -> Result<&'a str, String> {
        std::str::from_utf8(self.read_string()?).map_err(|_| "string is not UTF-8".to_string())
    }
}

#[cfg(test)]
pub(crate) fn push_string(buf: &mut Vec<u8>, data: &[u8]) {
    buf.extend_from_slice(&(data.len() as u32).to_be_bytes());
    buf.extend_from_slice(data);
}

/// Public key blob (`string algorithm || string key`) for tests
#[cfg(test)]
pub(crate) fn test_public_blob(algorithm: &str) -> Vec<u8> {
    let mut blob = Vec::new();
    push_string(&mut blob, algorithm.as_bytes());
    push_string(&mut blob, &[7u8; 32]);
    blob
}
