use rand::Rng;
use rand::seq::IndexedRandom;

pub const CAPTCHA_LENGTH: usize = 6;

/// Letters and digits minus the ones that are easy to confuse (`0 O 1 I l`).
pub const CAPTCHA_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz23456789";

const MAX_ROTATION_DEG: f32 = 15.0;
const MAX_OFFSET_Y: f32 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptchaGlyph {
    pub ch: char,
    pub rotation_deg: f32,
    pub offset_y: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Captcha {
    glyphs: Vec<CaptchaGlyph>,
}

impl Captcha {
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let glyphs = (0..CAPTCHA_LENGTH)
            .map(|_| {
                let ch = CAPTCHA_ALPHABET.choose(rng).copied().unwrap_or(b'A') as char;
                CaptchaGlyph {
                    ch,
                    rotation_deg: rng.random_range(-MAX_ROTATION_DEG..=MAX_ROTATION_DEG),
                    offset_y: rng.random_range(-MAX_OFFSET_Y..=MAX_OFFSET_Y),
                }
            })
            .collect();
        Self { glyphs }
    }

    pub fn glyphs(&self) -> &[CaptchaGlyph] {
        &self.glyphs
    }

    pub fn text(&self) -> String {
        self.glyphs.iter().map(|glyph| glyph.ch).collect()
    }

    /// Case-insensitive match against the user's answer, ignoring surrounding whitespace.
    pub fn verify(&self, input: &str) -> bool {
        let input = input.trim();
        input.chars().count() == self.glyphs.len()
            && input
                .chars()
                .zip(self.glyphs.iter())
                .all(|(typed, glyph)| typed.eq_ignore_ascii_case(&glyph.ch))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn generated_text_avoids_ambiguous_glyphs() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..200 {
            let captcha = Captcha::generate(&mut rng);
            let text = captcha.text();
            assert_eq!(text.chars().count(), CAPTCHA_LENGTH);
            assert!(!text.contains(['0', 'O', '1', 'I', 'l']), "{text}");
        }
    }

    #[test]
    fn jitter_stays_in_bounds() {
        let mut rng = StdRng::seed_from_u64(11);
        let captcha = Captcha::generate(&mut rng);
        for glyph in captcha.glyphs() {
            assert!(glyph.rotation_deg.abs() <= MAX_ROTATION_DEG);
            assert!(glyph.offset_y.abs() <= MAX_OFFSET_Y);
        }
    }

    #[test]
    fn verify_ignores_case_and_padding() {
        let captcha = Captcha::generate(&mut StdRng::seed_from_u64(5));
        let text = captcha.text();
        assert!(captcha.verify(&text));
        assert!(captcha.verify(&format!("  {}  ", text.to_lowercase())));
        assert!(captcha.verify(&text.to_uppercase()));
        assert!(!captcha.verify(&text[..CAPTCHA_LENGTH - 1]));
        assert!(!captcha.verify(""));
    }
}
