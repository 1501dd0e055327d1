//! Número de série do painel
//!
//! Formato `XXXX-0000`: quatro letras maiúsculas, hífen, quatro dígitos.
//! Raramente as letras vêm do alfabeto cirílico (U+0410..U+042F).

use rand::Rng;

/// Comprimento em caracteres do número de série
pub const SERIAL_LEN: usize = 9;

/// Gera número de série. `alternate_chance` é a probabilidade de usar o
/// alfabeto cirílico nas quatro letras.
pub fn generate_serial_number<R: Rng + ?Sized>(rng: &mut R, alternate_chance: f64) -> String {
    let mut serial = String::with_capacity(SERIAL_LEN * 2);

    let letters = if rng.gen_bool(probability(alternate_chance)) {
        '\u{0410}'..'\u{0430}'
    } else {
        'A'..'['
    };
    for _ in 0..4 {
        serial.push(rng.gen_range(letters.clone()));
    }

    serial.push('-');
    for _ in 0..4 {
        serial.push(rng.gen_range('0'..='9'));
    }

    serial
}

/// Probabilidade utilizável por `gen_bool`: valores fora de `[0, 1]` são
/// limitados e NaN vira 0.
pub fn probability(chance: f64) -> f64 {
    if chance.is_nan() {
        0.0
    } else {
        chance.clamp(0.0, 1.0)
    }
}

/// Gera semente de fios em `1..i32::MAX`
pub fn generate_wire_seed<R: Rng + ?Sized>(rng: &mut R) -> i32 {
    rng.gen_range(1..i32::MAX)
}
