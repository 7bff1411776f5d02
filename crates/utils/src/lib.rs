use rand::Rng;

/// Generates a random uppercase alphanumeric code of the given length.
/// Ambiguous characters (`I`, `O`, `0`, `1`) are left out since these codes
/// are read over the phone and typed by hand.
pub fn create_random_code(length: usize) -> String {
    const CHARSET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
    let mut rng = rand::thread_rng();

    (0..length)
        .map(|_| {
            let idx = rng.gen_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}
