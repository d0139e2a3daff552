use crate::{deserialize_data, serialize_data, Checksum, Compression, Result};

use serde::{de::DeserializeOwned, Serialize};

/// Bincode serializes `value`, then runs the payload codec over the bytes. This provides a decent default encoding for any
/// serializable type.
pub fn serialize_object<T>(value: &T, compression: Compression, checksum: Checksum) -> Result<Vec<u8>>
where
    T: Serialize + ?Sized,
{
    let bytes = bincode::serialize(value)?;

    serialize_data(&bytes, compression, checksum)
}

/// The inverse of `serialize_object`. The compression format and checksum are read from the value itself.
pub fn deserialize_object<T>(s: &[u8]) -> Result<T>
where
    T: DeserializeOwned,
{
    let (bytes, _format) = deserialize_data(s, true)?;

    Ok(bincode::deserialize(&bytes)?)
}

// ████████╗███████╗███████╗████████╗███████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝
//    ██║   █████╗  ███████╗   ██║   ███████╗
//    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║
//    ██║   ███████╗███████║   ██║   ███████║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝
