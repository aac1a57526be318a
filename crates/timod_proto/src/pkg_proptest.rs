#[cfg(test)]
mod tests {
    use crate::{Ex, Pkg, PkgBuffer, PkgHeader, Proto};
    use proptest::prelude::*;

    proptest! {
        // Arbitrary input never panics the framing code
        #[test]
        fn test_buffer_never_panics(bytes in proptest::collection::vec(any::<u8>(), 0..256)) {
            let mut buffer = PkgBuffer::new();
            buffer.extend(&bytes);
            while let Ok(Some(_)) = buffer.next_pkg() {}
        }

        #[test]
        fn test_header_roundtrip(size in 0..4096u32, pid in any::<u16>(), tp in any::<u8>()) {
            let header = PkgHeader { size, pid, tp };
            prop_assert_eq!(PkgHeader::decode(&header.encode()).unwrap(), header);
        }

        // Error replies keep the correlation id and message through framing
        #[test]
        fn test_error_reply_survives_framing(pid in any::<u16>(), msg in ".{0,64}") {
            let pkg = Pkg::error(pid, Ex::BadData, &msg);
            let mut buffer = PkgBuffer::new();
            buffer.extend(&pkg.encode());

            let decoded = buffer.next_pkg().unwrap().unwrap();
            prop_assert_eq!(decoded.pid, pid);
            prop_assert_eq!(decoded.proto(), Ok(Proto::ModuleErr));
            let (code, text): (i8, String) = decoded.unpack().unwrap();
            prop_assert_eq!(code, Ex::BadData.code());
            prop_assert_eq!(text, msg);
            prop_assert!(buffer.is_empty());
        }
    }
}
