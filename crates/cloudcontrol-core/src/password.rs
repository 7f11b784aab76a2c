// Administrator password generation for customized server deploys.

use rand::seq::{IndexedRandom, SliceRandom};
use rand::{Rng, rng};

const LOWER: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const UPPER: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &[u8] = b"0123456789";
/// ASCII punctuation minus `< > ' \`, which guest customization mangles.
const SPECIAL: &[u8] = b"!\"#$%&()*+,-./:;=?@[]^_`{|}~";

const MIN_LEN: usize = 12;
const MAX_LEN: usize = 19;

/// A random 12 to 19 character password with every character class present.
pub fn generate_password() -> String {
    generate_with(&mut rng())
}

pub(crate) fn generate_with<R: Rng + ?Sized>(rng: &mut R) -> String {
    let classes = [LOWER, UPPER, DIGITS, SPECIAL];
    let len = rng.random_range(MIN_LEN..=MAX_LEN);

    let mut chars: Vec<u8> = classes
        .iter()
        .filter_map(|class| class.choose(rng).copied())
        .collect();
    while chars.len() < len {
        if let Some(c) = classes.choose(rng).and_then(|class| class.choose(rng)) {
            chars.push(*c);
        }
    }
    chars.shuffle(rng);
    chars.into_iter().map(char::from).collect()
}
