use crate::wire::wire_enum;

wire_enum! {
    pub enum HandshakeType: u8 {
        ClientHello = 1,
        ServerHello = 2,
        Certificate = 11,
        ServerKeyExchange = 12,
        ServerHelloDone = 14,
        ClientKeyExchange = 16,
    }
}

wire_enum! {
    #[allow(non_camel_case_types)]
    pub enum CipherSuite: u16 {
        TLS_NULL_WITH_NULL_NULL = 0x0000,
        TLS_RSA_WITH_RC4_128_MD5 = 0x0004,
        TLS_RSA_WITH_RC4_128_SHA = 0x0005,
        TLS_RSA_WITH_3DES_EDE_CBC_SHA = 0x000a,
        TLS_DHE_DSS_WITH_3DES_EDE_CBC_SHA = 0x0013,
        TLS_DHE_RSA_WITH_3DES_EDE_CBC_SHA = 0x0016,
        TLS_RSA_WITH_AES_128_CBC_SHA = 0x002f,
        TLS_DHE_DSS_WITH_AES_128_CBC_SHA = 0x0032,
        TLS_DHE_RSA_WITH_AES_128_CBC_SHA = 0x0033,
        TLS_RSA_WITH_AES_256_CBC_SHA = 0x0035,
        TLS_DHE_DSS_WITH_AES_256_CBC_SHA = 0x0038,
        TLS_DHE_RSA_WITH_AES_256_CBC_SHA = 0x0039,
        TLS_RSA_WITH_AES_128_CBC_SHA256 = 0x003c,
        TLS_RSA_WITH_AES_256_CBC_SHA256 = 0x003d,
        TLS_DHE_RSA_WITH_CAMELLIA_128_CBC_SHA = 0x0045,
        TLS_DHE_RSA_WITH_AES_128_CBC_SHA256 = 0x0067,
        TLS_DHE_RSA_WITH_AES_256_CBC_SHA256 = 0x006b,
        TLS_DHE_RSA_WITH_CAMELLIA_256_CBC_SHA = 0x0088,
        TLS_RSA_WITH_AES_128_GCM_SHA256 = 0x009c,
        TLS_RSA_WITH_AES_256_GCM_SHA384 = 0x009d,
        TLS_DHE_RSA_WITH_AES_128_GCM_SHA256 = 0x009e,
        TLS_DHE_RSA_WITH_AES_256_GCM_SHA384 = 0x009f,
        TLS_EMPTY_RENEGOTIATION_INFO_SCSV = 0x00ff,
        TLS_ECDHE_ECDSA_WITH_AES_128_CBC_SHA = 0xc009,
        TLS_ECDHE_ECDSA_WITH_AES_256_CBC_SHA = 0xc00a,
        TLS_ECDHE_RSA_WITH_AES_128_CBC_SHA = 0xc013,
        TLS_ECDHE_RSA_WITH_AES_256_CBC_SHA = 0xc014,
        TLS_ECDHE_ECDSA_WITH_AES_128_GCM_SHA256 = 0xc02b,
        TLS_ECDHE_RSA_WITH_AES_128_GCM_SHA256 = 0xc02f,
    }
}

wire_enum! {
    pub enum CompressionMethod: u8 {
        Null = 0,
        Deflate = 1,
    }
}

wire_enum! {
    pub enum ExtensionType: u16 {
        ServerName = 0,
        StatusRequest = 5,
        SupportedGroups = 10,
        EcPointFormats = 11,
        SignatureAlgorithms = 13,
        Heartbeat = 15,
        ApplicationLayerProtocolNegotiation = 16,
        Padding = 21,
        EncryptThenMac = 22,
        ExtendedMasterSecret = 23,
        SessionTicket = 35,
        RenegotiationInfo = 0xff01,
    }
}

wire_enum! {
    pub enum HashAlgorithm: u8 {
        None = 0,
        Md5 = 1,
        Sha1 = 2,
        Sha224 = 3,
        Sha256 = 4,
        Sha384 = 5,
        Sha512 = 6,
    }
}

wire_enum! {
    pub enum SignatureAlgorithm: u8 {
        Anonymous = 0,
        Rsa = 1,
        Dsa = 2,
        Ecdsa = 3,
    }
}

wire_enum! {
    pub enum NamedGroup: u16 {
        Secp256r1 = 23,
        Secp384r1 = 24,
        Secp521r1 = 25,
        X25519 = 29,
        X448 = 30,
        Ffdhe2048 = 256,
        Ffdhe3072 = 257,
    }
}

wire_enum! {
    pub enum EcPointFormat: u8 {
        Uncompressed = 0,
        AnsiX962CompressedPrime = 1,
        AnsiX962CompressedChar2 = 2,
    }
}
