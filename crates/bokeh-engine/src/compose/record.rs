use bytemuck::{Pod, Zeroable};

/// Bytes per encoded instance.
pub const INSTANCE_BYTES: usize = 48;

const _: () = assert!(std::mem::size_of::<BokehInstance>() == INSTANCE_BYTES);

/// Per-instance bokeh data read by the vertex shader (48 bytes).
///
///  offset  0  center           [f32; 2]   normalized screen, top-left origin
///  offset  8  half_size        [f32; 2]   normalized screen units
///  offset 16  color            [f32; 4]   linear RGB, alpha = final opacity
///  offset 32  light_id         u32
///  offset 36  descriptor_index u32
///  offset 40  _pad             [u32; 2]   16-byte struct alignment in WGSL
///
/// Must match `struct BokehInstance` in `render/shaders/bokeh.wgsl`.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct BokehInstance {
    pub center: [f32; 2],
    pub half_size: [f32; 2],
    pub color: [f32; 4],
    pub light_id: u32,
    pub descriptor_index: u32,
    pub _pad: [u32; 2],
}

impl BokehInstance {
    /// Size in bytes of one record.
    pub const SIZE: usize = INSTANCE_BYTES;

    /// Serializes the record field by field, little-endian.
    pub fn to_le_bytes(&self) -> [u8; INSTANCE_BYTES] {
        let mut out = [0u8; Self::SIZE];
        let words: [u32; 12] = [
            self.center[0].to_bits(),
            self.center[1].to_bits(),
            self.half_size[0].to_bits(),
            self.half_size[1].to_bits(),
            self.color[0].to_bits(),
            self.color[1].to_bits(),
            self.color[2].to_bits(),
            self.color[3].to_bits(),
            self.light_id,
            self.descriptor_index,
            0,
            0,
        ];
        for (chunk, w) in out.chunks_exact_mut(4).zip(words) {
            chunk.copy_from_slice(&w.to_le_bytes());
        }
        out
    }

    /// Inverse of [`BokehInstance::to_le_bytes`].
    pub fn from_le_bytes(bytes: &[u8; INSTANCE_BYTES]) -> Self {
        let mut w = [0u32; 12];
        for (dst, chunk) in w.iter_mut().zip(bytes.chunks_exact(4)) {
            *dst = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }
        let f = f32::from_bits;
        Self {
            center: [f(w[0]), f(w[1])],
            half_size: [f(w[2]), f(w[3])],
            color: [f(w[4]), f(w[5]), f(w[6]), f(w[7])],
            light_id: w[8],
            descriptor_index: w[9],
            _pad: [0; 2],
        }
    }

    /// Decodes a packed array, as uploaded to the GPU.
    ///
    /// Returns `None` if `bytes` is not a whole number of records.
    pub fn decode_all(bytes: &[u8]) -> Option<Vec<Self>> {
        if bytes.len() % Self::SIZE != 0 {
            return None;
        }
        bytes
            .chunks_exact(Self::SIZE)
            .map(|c| c.try_into().ok().map(Self::from_le_bytes))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> BokehInstance {
        BokehInstance {
            center: [0.25, -0.5],
            half_size: [0.1, 0.05],
            color: [1.0, 0.5, 0.25, 0.75],
            light_id: 7,
            descriptor_index: 3,
            _pad: [0; 2],
        }
    }

    #[test]
    fn record_is_48_bytes() {
        assert_eq!(BokehInstance::SIZE, 48);
        assert_eq!(std::mem::align_of::<BokehInstance>(), 4);
    }

    #[test]
    fn le_bytes_round_trip() {
        let rec = sample();
        assert_eq!(BokehInstance::from_le_bytes(&rec.to_le_bytes()), rec);
    }

    #[test]
    fn field_offsets_are_fixed() {
        let bytes = sample().to_le_bytes();
        assert_eq!(&bytes[0..4], &0.25f32.to_le_bytes());
        assert_eq!(&bytes[16..20], &1.0f32.to_le_bytes());
        assert_eq!(&bytes[32..36], &7u32.to_le_bytes());
        assert_eq!(&bytes[36..40], &3u32.to_le_bytes());
        assert_eq!(&bytes[40..48], &[0u8; 8]);
    }

    #[cfg(target_endian = "little")]
    #[test]
    fn gpu_upload_bytes_match_explicit_encoding() {
        let recs = [sample(), BokehInstance::default()];
        let uploaded: &[u8] = bytemuck::cast_slice(&recs);
        assert_eq!(&uploaded[..48], &recs[0].to_le_bytes());
        assert_eq!(BokehInstance::decode_all(uploaded).unwrap(), recs.to_vec());
    }

    #[test]
    fn decode_rejects_partial_record() {
        assert!(BokehInstance::decode_all(&[0u8; 47]).is_none());
        assert_eq!(BokehInstance::decode_all(&[]).unwrap(), Vec::new());
    }
}
