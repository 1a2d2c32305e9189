use rand::{RngCore, TryRngCore, rngs::OsRng};

/// A source of random bytes for the ULID randomness field.
///
/// Implementations must be callable from multiple threads through a shared
/// reference; the built-in sources are zero-sized handles over per-thread or
/// OS-level generators, so they carry no state of their own.
pub trait RandSource {
    /// Fills `dest` with random bytes.
    fn fill_bytes(&self, dest: &mut [u8]);
}

impl<R: RandSource + ?Sized> RandSource for &R {
    fn fill_bytes(&self, dest: &mut [u8]) {
        (**self).fill_bytes(dest)
    }
}

/// A [`RandSource`] backed by the thread-local RNG.
///
/// Fast, cryptographically secure (ChaCha-based), and periodically reseeded.
/// Each OS thread owns its generator, so concurrent calls are
/// contention-free. This type does not store the RNG itself; it accesses the
/// thread-local generator on each call, which is what keeps it `Send + Sync`
/// despite `ThreadRng` being neither.
#[derive(Default, Clone, Copy, Debug)]
pub struct ThreadRandom;

impl RandSource for ThreadRandom {
    fn fill_bytes(&self, dest: &mut [u8]) {
        rand::rng().fill_bytes(dest);
    }
}

/// A [`RandSource`] that draws directly from the operating system's entropy
/// source on every call.
///
/// Slower than [`ThreadRandom`] (each draw is a syscall) but never touches
/// userspace generator state. Matches the "secure randomness" construction
/// option at the cost of throughput.
#[derive(Default, Clone, Copy, Debug)]
pub struct SecureRandom;

impl RandSource for SecureRandom {
    fn fill_bytes(&self, dest: &mut [u8]) {
        // OS entropy failure is unrecoverable; this mirrors how the rest of
        // the ecosystem (getrandom, thread_rng seeding) treats it.
        OsRng
            .try_fill_bytes(dest)
            .expect("OS entropy source unavailable");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thread_random_fills_all_bytes() {
        let mut buf = [0u8; 10];
        ThreadRandom.fill_bytes(&mut buf);
        // 80 zero bits from a healthy RNG is a once-per-universe event.
        let mut other = [0u8; 10];
        ThreadRandom.fill_bytes(&mut other);
        assert!(buf != [0u8; 10] || other != [0u8; 10]);
    }

    #[test]
    fn secure_random_produces_distinct_draws() {
        let mut a = [0u8; 10];
        let mut b = [0u8; 10];
        SecureRandom.fill_bytes(&mut a);
        SecureRandom.fill_bytes(&mut b);
        assert_ne!(a, b);
    }
}
