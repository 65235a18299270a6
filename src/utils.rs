/// Sign-extend the low `bits` bits of a raw field value
#[allow(clippy::cast_possible_wrap)]
pub fn sign_extend(raw: u32, bits: u32) -> i32 {
    let shift = 32 - bits;
    ((raw << shift) as i32) >> shift
}

/// Two's complement encoding of `value` truncated to `bits` bits
#[allow(clippy::cast_sign_loss)]
pub fn truncate_signed(value: i32, bits: u32) -> u32 {
    (value as u32) & ((1 << bits) - 1)
}
