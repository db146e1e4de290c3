//! Fixed-size identifiers and numeric newtypes shared by every ledger shape.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::crypto;
use crate::error::{ExplorerError, Result};

pub const HASH_SIZE: usize = 32;

/// Number of checksum bytes appended to an unlock hash in its text form.
pub const UNLOCK_HASH_CHECKSUM_SIZE: usize = 6;

/// A 32-byte identifier. Blocks, transactions, outputs, addresses and
/// contracts all share this namespace.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Hash(pub [u8; HASH_SIZE]);

impl Hash {
    pub const ZERO: Hash = Hash([0u8; HASH_SIZE]);

    pub fn is_zero(&self) -> bool {
        *self == Hash::ZERO
    }

    pub fn as_bytes(&self) -> &[u8; HASH_SIZE] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Zero hashes stand for "absent" in daemon payloads.
    pub fn non_zero(self) -> Option<Hash> {
        if self.is_zero() {
            None
        } else {
            Some(self)
        }
    }
}

impl From<[u8; HASH_SIZE]> for Hash {
    fn from(bytes: [u8; HASH_SIZE]) -> Self {
        Hash(bytes)
    }
}

impl FromStr for Hash {
    type Err = ExplorerError;

    fn from_str(s: &str) -> Result<Self> {
        if s.len() != HASH_SIZE * 2 {
            return Err(ExplorerError::InvalidInput(format!(
                "hash must be a {}-character hex string, got {} characters",
                HASH_SIZE * 2,
                s.len()
            )));
        }
        let mut bytes = [0u8; HASH_SIZE];
        hex::decode_to_slice(s, &mut bytes)
            .map_err(|e| ExplorerError::InvalidInput(format!("invalid hex hash: {}", e)))?;
        Ok(Hash(bytes))
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash({})", self.to_hex())
    }
}

impl Serialize for Hash {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Hash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Parses a caller-supplied lookup key: either a bare 64-char hash or a
/// 76-char checksummed address.
pub fn parse_lookup_hash(input: &str) -> Result<Hash> {
    let trimmed = input.trim().to_ascii_lowercase();
    if trimmed.len() == (HASH_SIZE + UNLOCK_HASH_CHECKSUM_SIZE) * 2 {
        return trimmed.parse::<UnlockHash>().map(|uh| uh.0);
    }
    trimmed.parse()
}

/// An address. Its text form carries a checksum of the first six bytes of
/// the BLAKE2b-256 digest of the hash.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Debug)]
pub struct UnlockHash(pub Hash);

impl UnlockHash {
    pub fn checksum(&self) -> [u8; UNLOCK_HASH_CHECKSUM_SIZE] {
        let digest = crypto::hash_bytes(self.0.as_bytes());
        let mut out = [0u8; UNLOCK_HASH_CHECKSUM_SIZE];
        out.copy_from_slice(&digest.0[..UNLOCK_HASH_CHECKSUM_SIZE]);
        out
    }
}

impl FromStr for UnlockHash {
    type Err = ExplorerError;

    fn from_str(s: &str) -> Result<Self> {
        // lengths below are byte counts; slicing is only sound on ASCII
        if !s.is_ascii() {
            return Err(ExplorerError::InvalidInput(
                "address must be hex characters only".to_string(),
            ));
        }
        match s.len() {
            64 => Ok(UnlockHash(s.parse()?)),
            76 => {
                let hash: Hash = s[..64].parse()?;
                let uh = UnlockHash(hash);
                let mut given = [0u8; UNLOCK_HASH_CHECKSUM_SIZE];
                hex::decode_to_slice(&s[64..], &mut given).map_err(|e| {
                    ExplorerError::InvalidInput(format!("invalid address checksum hex: {}", e))
                })?;
                if given != uh.checksum() {
                    return Err(ExplorerError::InvalidInput(
                        "address checksum does not match".to_string(),
                    ));
                }
                Ok(uh)
            }
            n => Err(ExplorerError::InvalidInput(format!(
                "address must be 64 or 76 hex characters, got {}",
                n
            ))),
        }
    }
}

impl fmt::Display for UnlockHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.0.to_hex(), hex::encode(self.checksum()))
    }
}

impl Serialize for UnlockHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for UnlockHash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.to_ascii_lowercase()
            .parse()
            .map_err(serde::de::Error::custom)
    }
}

/// Coin amount in the smallest unit. The daemon encodes it as a decimal string.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Debug)]
pub struct Currency(pub u128);

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for Currency {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CurrencyRepr {
    Text(String),
    Number(u64),
}

impl<'de> Deserialize<'de> for Currency {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        match CurrencyRepr::deserialize(deserializer)? {
            CurrencyRepr::Number(n) => Ok(Currency(n as u128)),
            CurrencyRepr::Text(s) => s
                .parse::<u128>()
                .map(Currency)
                .map_err(|e| serde::de::Error::custom(format!("invalid currency {:?}: {}", s, e))),
        }
    }
}

/// Proof-of-work target, 32 big-endian bytes. A block is valid when its ID is
/// below the target, so a higher target means less work.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub struct Target(pub [u8; HASH_SIZE]);

impl Target {
    /// Expected number of hashes needed to find a block at this target:
    /// `floor((2^256 - 1) / target)`. A zero target saturates.
    pub fn expected_hashes(&self) -> HashCount {
        let divisor = limbs_from_be(&self.0);
        if divisor == [0u64; 4] {
            return HashCount::MAX;
        }

        let mut quotient = [0u64; 4];
        let mut remainder = [0u64; 4];
        for bit in (0..256).rev() {
            let carry = remainder[3] >> 63;
            shl1(&mut remainder);
            // every bit of the numerator is set
            remainder[0] |= 1;
            if carry == 1 || cmp_limbs(&remainder, &divisor) != Ordering::Less {
                wrapping_sub(&mut remainder, &divisor);
                quotient[bit / 64] |= 1u64 << (bit % 64);
            }
        }
        HashCount(quotient)
    }
}

impl Serialize for Target {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(self.0))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TargetRepr {
    Hex(String),
    Bytes([u8; HASH_SIZE]),
}

impl<'de> Deserialize<'de> for Target {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        match TargetRepr::deserialize(deserializer)? {
            TargetRepr::Bytes(bytes) => Ok(Target(bytes)),
            TargetRepr::Hex(s) => {
                let mut bytes = [0u8; HASH_SIZE];
                hex::decode_to_slice(&s, &mut bytes)
                    .map_err(|e| serde::de::Error::custom(format!("invalid target hex: {}", e)))?;
                Ok(Target(bytes))
            }
        }
    }
}

/// An unsigned 256-bit hash count, little-endian 64-bit limbs.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Debug)]
pub struct HashCount(pub [u64; 4]);

impl HashCount {
    pub const MAX: HashCount = HashCount([u64::MAX; 4]);

    pub fn from_u128(value: u128) -> Self {
        HashCount([value as u64, (value >> 64) as u64, 0, 0])
    }
}

impl Ord for HashCount {
    fn cmp(&self, other: &Self) -> Ordering {
        cmp_limbs(&self.0, &other.0)
    }
}

impl PartialOrd for HashCount {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for HashCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const CHUNK: u64 = 10_000_000_000_000_000_000;

        let mut value = self.0;
        let mut chunks = Vec::new();
        loop {
            chunks.push(div_rem_small(&mut value, CHUNK));
            if value == [0u64; 4] {
                break;
            }
        }

        let mut out = String::new();
        for (i, chunk) in chunks.iter().rev().enumerate() {
            if i == 0 {
                out.push_str(&chunk.to_string());
            } else {
                out.push_str(&format!("{:019}", chunk));
            }
        }
        f.write_str(&out)
    }
}

impl Serialize for HashCount {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

fn limbs_from_be(bytes: &[u8; HASH_SIZE]) -> [u64; 4] {
    let mut limbs = [0u64; 4];
    for (i, limb) in limbs.iter_mut().enumerate() {
        let start = HASH_SIZE - (i + 1) * 8;
        let mut word = [0u8; 8];
        word.copy_from_slice(&bytes[start..start + 8]);
        *limb = u64::from_be_bytes(word);
    }
    limbs
}

fn cmp_limbs(a: &[u64; 4], b: &[u64; 4]) -> Ordering {
    for i in (0..4).rev() {
        match a[i].cmp(&b[i]) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    Ordering::Equal
}

fn shl1(limbs: &mut [u64; 4]) {
    for i in (1..4).rev() {
        limbs[i] = (limbs[i] << 1) | (limbs[i - 1] >> 63);
    }
    limbs[0] <<= 1;
}

fn wrapping_sub(a: &mut [u64; 4], b: &[u64; 4]) {
    let mut borrow = false;
    for i in 0..4 {
        let (diff, b1) = a[i].overflowing_sub(b[i]);
        let (diff, b2) = diff.overflowing_sub(borrow as u64);
        a[i] = diff;
        borrow = b1 || b2;
    }
}

fn div_rem_small(limbs: &mut [u64; 4], divisor: u64) -> u64 {
    let mut rem: u128 = 0;
    for i in (0..4).rev() {
        let cur = (rem << 64) | limbs[i] as u128;
        limbs[i] = (cur / divisor as u128) as u64;
        rem = cur % divisor as u128;
    }
    rem as u64
}

pub const SPECIFIER_SIZE: usize = 16;

/// A 16-byte, zero-padded ASCII tag. JSON carries it as the tag text with
/// the padding stripped.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Specifier(pub [u8; SPECIFIER_SIZE]);

impl Specifier {
    /// Names longer than 16 bytes are truncated.
    pub const fn new(name: &[u8]) -> Self {
        let mut out = [0u8; SPECIFIER_SIZE];
        let mut i = 0;
        while i < name.len() && i < SPECIFIER_SIZE {
            out[i] = name[i];
            i += 1;
        }
        Specifier(out)
    }

    pub fn as_bytes(&self) -> &[u8; SPECIFIER_SIZE] {
        &self.0
    }
}

impl fmt::Display for Specifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let end = self
            .0
            .iter()
            .rposition(|&b| b != 0)
            .map_or(0, |i| i + 1);
        f.write_str(&String::from_utf8_lossy(&self.0[..end]))
    }
}

impl fmt::Debug for Specifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Specifier({:?})", self.to_string())
    }
}

impl Serialize for Specifier {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Specifier {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        if s.len() > SPECIFIER_SIZE {
            return Err(serde::de::Error::custom(format!(
                "specifier {:?} is longer than {} bytes",
                s, SPECIFIER_SIZE
            )));
        }
        Ok(Specifier::new(s.as_bytes()))
    }
}

/// Opaque byte string; JSON carries it as standard base64, `null` when empty.
#[derive(Clone, PartialEq, Eq, Hash, Default, Debug)]
pub struct Bytes(pub Vec<u8>);

impl Serialize for Bytes {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(&self.0))
    }
}

impl<'de> Deserialize<'de> for Bytes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(Bytes::default()),
            Some(s) => STANDARD
                .decode(s.as_bytes())
                .map(Bytes)
                .map_err(|e| serde::de::Error::custom(format!("invalid base64: {}", e))),
        }
    }
}

pub const SEGMENT_SIZE: usize = 64;

/// The leaf of file data a storage proof reveals. JSON carries it as an
/// array of 64 byte values.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Segment(pub [u8; SEGMENT_SIZE]);

impl Default for Segment {
    fn default() -> Self {
        Segment([0u8; SEGMENT_SIZE])
    }
}

impl Serialize for Segment {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.iter())
    }
}

impl<'de> Deserialize<'de> for Segment {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let bytes = Vec::<u8>::deserialize(deserializer)?;
        let len = bytes.len();
        let array: [u8; SEGMENT_SIZE] = bytes.try_into().map_err(|_| {
            serde::de::Error::custom(format!(
                "segment must be {} bytes, got {}",
                SEGMENT_SIZE, len
            ))
        })?;
        Ok(Segment(array))
    }
}

/// Go encodes nil slices as `null`; treat those as empty.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target_from_hex(s: &str) -> Target {
        let padded = format!("{:0>64}", s);
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(padded, &mut bytes).unwrap();
        Target(bytes)
    }

    #[test]
    fn test_hash_hex_round_trip() {
        let hash = Hash([0xab; 32]);
        let text = hash.to_string();
        assert_eq!(text.len(), 64);
        assert_eq!(text.parse::<Hash>().unwrap(), hash);

        let json = serde_json::to_string(&hash).unwrap();
        assert_eq!(json, format!("\"{}\"", text));
        assert_eq!(serde_json::from_str::<Hash>(&json).unwrap(), hash);
    }

    #[test]
    fn test_hash_rejects_bad_input() {
        assert!(matches!(
            "abcd".parse::<Hash>(),
            Err(ExplorerError::InvalidInput(_))
        ));
        let not_hex = "zz".repeat(32);
        assert!(matches!(
            not_hex.parse::<Hash>(),
            Err(ExplorerError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_unlock_hash_checksum() {
        let uh = UnlockHash(Hash([0x33; 32]));
        assert_eq!(hex::encode(uh.checksum()), "510c7466f2a9");

        let text = uh.to_string();
        assert_eq!(text.len(), 76);
        assert!(text.ends_with("510c7466f2a9"));
        assert_eq!(text.parse::<UnlockHash>().unwrap(), uh);

        let mut tampered = text.clone();
        tampered.replace_range(75..76, "0");
        assert!(tampered.parse::<UnlockHash>().is_err());

        // the bare hash form is accepted too
        let bare: UnlockHash = serde_json::from_str(&format!("\"{}\"", "33".repeat(32))).unwrap();
        assert_eq!(bare, uh);
    }

    #[test]
    fn test_parse_lookup_hash_accepts_addresses() {
        let uh = UnlockHash(Hash([0x33; 32]));
        let address = uh.to_string().to_uppercase();
        assert_eq!(parse_lookup_hash(&address).unwrap(), uh.0);
        assert_eq!(
            parse_lookup_hash(&format!("  {}\n", "33".repeat(32))).unwrap(),
            uh.0
        );
        assert!(parse_lookup_hash("1234").is_err());
    }

    #[test]
    fn test_parse_lookup_hash_rejects_multibyte_input() {
        // 76 bytes, but byte 64 falls inside a two-byte character
        let split = format!("{}é{}", "a".repeat(63), "a".repeat(11));
        assert_eq!(split.len(), 76);
        assert!(matches!(
            parse_lookup_hash(&split),
            Err(ExplorerError::InvalidInput(_))
        ));

        let wide = "é".repeat(38);
        assert!(matches!(
            parse_lookup_hash(&wide),
            Err(ExplorerError::InvalidInput(_))
        ));
        assert!(matches!(
            format!("{}é", "a".repeat(74)).parse::<UnlockHash>(),
            Err(ExplorerError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_wire_primitives_json() {
        let spec: Specifier = serde_json::from_str("\"ed25519\"").unwrap();
        assert_eq!(spec, Specifier::new(b"ed25519"));
        assert_eq!(&spec.as_bytes()[7..], &[0u8; 9]);
        assert_eq!(serde_json::to_string(&spec).unwrap(), "\"ed25519\"");
        assert!(serde_json::from_str::<Specifier>("\"seventeen bytes!!\"").is_err());

        let data: Bytes = serde_json::from_str("\"aGVsbG8=\"").unwrap();
        assert_eq!(data.0, b"hello");
        assert_eq!(serde_json::from_str::<Bytes>("null").unwrap(), Bytes::default());
        assert!(serde_json::from_str::<Bytes>("\"not base64!\"").is_err());

        let bytes: Vec<u8> = (0..64).collect();
        let segment: Segment = serde_json::from_value(serde_json::json!(bytes)).unwrap();
        assert_eq!(segment.0[63], 63);
        assert!(serde_json::from_str::<Segment>("[1, 2, 3]").is_err());
    }

    #[test]
    fn test_currency_decoding() {
        let c: Currency = serde_json::from_str("\"300000000000000000000000000000\"").unwrap();
        assert_eq!(c.0, 300_000_000_000_000_000_000_000_000_000u128);
        let n: Currency = serde_json::from_str("42").unwrap();
        assert_eq!(n, Currency(42));
        assert!(serde_json::from_str::<Currency>("\"-5\"").is_err());
        assert_eq!(serde_json::to_string(&Currency(7)).unwrap(), "\"7\"");
    }

    #[test]
    fn test_target_accepts_hex_and_byte_arrays() {
        let mut bytes = [0u8; 32];
        bytes[4] = 0xff;
        let from_array: Target = serde_json::from_str(&serde_json::to_string(&bytes).unwrap()).unwrap();
        let from_hex: Target = serde_json::from_str(&format!("\"{}\"", hex::encode(bytes))).unwrap();
        assert_eq!(from_array, from_hex);
        assert_eq!(from_array.0, bytes);
    }

    #[test]
    fn test_expected_hashes_known_values() {
        // 2^224 - 1
        let t = target_from_hex(&"ff".repeat(28));
        assert_eq!(t.expected_hashes().to_string(), "4294967296");

        // 2^255
        let t = target_from_hex(&format!("8{}", "0".repeat(63)));
        assert_eq!(t.expected_hashes().to_string(), "1");

        // 2^200
        let t = target_from_hex(&format!("1{}", "0".repeat(50)));
        assert_eq!(t.expected_hashes().to_string(), "72057594037927935");

        let t = target_from_hex(&format!("a1{}", "00".repeat(24)));
        assert_eq!(t.expected_hashes().to_string(), "114576050147264295");

        let t = target_from_hex("1");
        assert_eq!(
            t.expected_hashes().to_string(),
            "115792089237316195423570985008687907853269984665640564039457584007913129639935"
        );
    }

    #[test]
    fn test_expected_hashes_decrease_as_target_grows() {
        let easy = target_from_hex(&format!("ff{}", "00".repeat(26)));
        let hard = target_from_hex(&format!("01{}", "00".repeat(26)));
        assert!(easy.expected_hashes() < hard.expected_hashes());
        assert_eq!(Target::default().expected_hashes(), HashCount::MAX);
    }

    #[test]
    fn test_hash_count_display() {
        assert_eq!(HashCount::default().to_string(), "0");
        assert_eq!(HashCount::from_u128(u64::MAX as u128 + 1).to_string(), "18446744073709551616");
        assert_eq!(
            serde_json::to_string(&HashCount::from_u128(10_000_000_000_000_000_000)).unwrap(),
            "\"10000000000000000000\""
        );
    }
}
