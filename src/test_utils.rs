//! Shared fixtures for unit tests

use num_bigint::BigUint;
use num_traits::Num;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::keys::KeyPair;

// 512-bit safe prime p = 2q + 1, g of order q, x secret, h = g^x mod p
pub const FIXTURE_P: &str = "cdbdecb14f7f4122c2dd759c2f15818521d7e4bc6ab68ce108894a96030076248a2cf7e16b0367c7f86869e8c5138c042670e7cceaa0bb9fae65ed471af3d997";
pub const FIXTURE_Q: &str = "66def658a7bfa091616ebace178ac0c290ebf25e355b46708444a54b01803b1245167bf0b581b3e3fc3434f46289c602133873e675505dcfd732f6a38d79eccb";
pub const FIXTURE_G: &str = "85195a006e049d1e3dd900d351282ec51866ceb57d28066f162b596612a47f93607dace5f02bd1f380324ca72b6e736920201b878d0c885d30c44988c4350688";
pub const FIXTURE_X: &str = "23201ad527412c43a64c9fdb2f97544a46d2261a7e08940c43f0026c598cfe125b55bd295dbbdda2de7f28a13f1f417b387a544ec5f72c6bfdc5a5107094bda9";
pub const FIXTURE_H: &str = "42137d7137dcf1cb1cb8ffa8752795047c045c0c098e94e0c7bd86c88907d820e963c275cbf045f3ff22a16b9a6839f73c641170e85dfc58e2897456e2b65e21";

pub fn hex(s: &str) -> BigUint {
    BigUint::from_str_radix(s, 16).unwrap()
}

pub fn fixture_keypair() -> KeyPair {
    KeyPair::from_components(hex(FIXTURE_P), hex(FIXTURE_G), hex(FIXTURE_X)).unwrap()
}

pub fn rng(seed: u64) -> ChaCha20Rng {
    ChaCha20Rng::seed_from_u64(seed)
}
