use rand::Rng;

pub trait IdSelector: Send + Sync {
    fn next_id(&self) -> u32;
}

/// Uniform draw over `1..=max_id`.
#[derive(Debug, Clone, Copy)]
pub struct RandomSelector {
    max_id: u32,
}

impl RandomSelector {
    pub fn new(max_id: u32) -> Self {
        Self {
            max_id: max_id.max(1),
        }
    }

    pub fn max_id(&self) -> u32 {
        self.max_id
    }

    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        rng.gen_range(1..=self.max_id)
    }
}

impl IdSelector for RandomSelector {
    fn next_id(&self) -> u32 {
        self.draw(&mut rand::thread_rng())
    }
}
