use num_bigint::BigUint;

use crate::crypto::{DhParams, RsaPrivateKey};

fn big(hex: &str) -> BigUint {
    BigUint::parse_bytes(hex.as_bytes(), 16).unwrap()
}

// 1024-bit RSA key, same material as the PEM fixtures shipped with the pki crate.
pub(crate) fn rsa_1024() -> RsaPrivateKey {
    RsaPrivateKey {
        n: big("bc9027fe5aeba64a2fbd53b4ebef0ad2e4ee815d891c6efeec95909ff2dd239e02a0d1d74faf596ca58091cce02172f674760788b4168aae8b4ddc3a463d7b0610d79dce5f060c986faf0445402bd6ae7302b5514d624bf1b49df971a14a5b88192f6d19d73981cbacf72f98aa539fac51f73acb82d28b79ed7a28566701ef33"),
        e: BigUint::from(65537u32),
        d: big("b957f117c102d4272399b347a88904589b921c32766d2e6500e35a8efdc78414f27c6506805ad94943bc86939cd3040f60160bfdc1164f2695e2e84f976f2315f8c2ac8e4fa726f6908aef1619d5ceb2aa3ef7e1b175075ef8b4739d7b234073a1ff34a59da60c63de38aca4f96f17ac93ed6f9996e40bed7ca9b0c944b2e881"),
    }
}

pub(crate) fn rsa_512() -> RsaPrivateKey {
    RsaPrivateKey {
        n: big("c0baacb61a737e17b71d33b11f56942eedc0fe1051e7494dcd04df6849cf14d74128bff136af9f3dc4bab07ea672b640efe366c13f6da381b14631fbf60b7b8f"),
        e: BigUint::from(65537u32),
        d: big("28ac7cdca5b2700f0337277c9ef77fa873c6c217a1a1652805379d0a7e6134ad6732848e154e9067eb6a3bc2afa740b7d6d15b5238ab100d5663edd306854e39"),
    }
}

// 512-bit safe prime, generator 2.
pub(crate) fn dh_512() -> DhParams {
    DhParams::new(
        big("d4280ba8a8ec2c7c663e69e597db32b137edc195d20f51a21f83a8cf7491543f99a2f32841003da56e565942d8077537630edc98d96d17c369f87d7b33cb360f"),
        BigUint::from(2u32),
    )
    .unwrap()
}
