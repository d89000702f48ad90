#![allow(dead_code)]

use hevote::KeyPair;
use num_bigint::BigUint;
use num_traits::Num;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

// 512-bit safe prime p = 2q + 1, g of order q, x secret
pub const P: &str = "cdbdecb14f7f4122c2dd759c2f15818521d7e4bc6ab68ce108894a96030076248a2cf7e16b0367c7f86869e8c5138c042670e7cceaa0bb9fae65ed471af3d997";
pub const G: &str = "85195a006e049d1e3dd900d351282ec51866ceb57d28066f162b596612a47f93607dace5f02bd1f380324ca72b6e736920201b878d0c885d30c44988c4350688";
pub const X: &str = "23201ad527412c43a64c9fdb2f97544a46d2261a7e08940c43f0026c598cfe125b55bd295dbbdda2de7f28a13f1f417b387a544ec5f72c6bfdc5a5107094bda9";

pub fn hex(s: &str) -> BigUint {
    BigUint::from_str_radix(s, 16).expect("valid hex constant")
}

pub fn keypair() -> KeyPair {
    KeyPair::from_components(hex(P), hex(G), hex(X)).expect("fixture key pair is valid")
}

pub fn keypair_with_secret(x: BigUint) -> KeyPair {
    KeyPair::from_components(hex(P), hex(G), x).expect("fixture group is valid")
}

pub fn rng(seed: u64) -> ChaCha20Rng {
    ChaCha20Rng::seed_from_u64(seed)
}
