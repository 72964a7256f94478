//! 1-out-of-2 oblivious transfer from the RSA trapdoor permutation
//! (Even–Goldreich–Lempel style).
//!
//! One transfer runs four messages:
//!
//! 1. sender → receiver: public key `(e, N)`
//! 2. sender → receiver: random `x0, x1 < 2^n`
//! 3. receiver → sender: `v = (x_b + k^e) mod N` for a random `k < N`
//! 4. sender → receiver: `m_i + (v - x_i)^d mod N` for `i = 0, 1`
//!
//! after which the receiver recovers `m_b` by subtracting `k`. The session
//! types below consume themselves at every step, so a session can neither
//! be replayed nor driven out of order.

use crypto_core::{AbstractChannel, Block, RsaParams, RsaPublicKey};
use num_bigint::{BigUint, RandBigInt};
use num_traits::{One, Zero};
use rand::{CryptoRng, Rng};

use super::errors::{OTReceiverError, OTSenderError};
use super::{OtReceiver, OtSender};

/// Message 2.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlindsMsg {
    pub x0: BigUint,
    pub x1: BigUint,
}

/// Message 3.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryMsg {
    pub v: BigUint,
}

/// Message 4.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MaskedMsg {
    pub m0k: BigUint,
    pub m1k: BigUint,
}

#[inline]
fn sub_mod(a: &BigUint, b: &BigUint, n: &BigUint) -> BigUint {
    ((a % n) + n - (b % n)) % n
}

pub fn block_to_biguint(block: &Block) -> BigUint {
    BigUint::from_bytes_be(block.as_ref())
}

pub fn biguint_to_block(x: &BigUint) -> Option<Block> {
    Block::from_be_slice(&x.to_bytes_be())
}

/// Sender session holding both messages, before message 2.
pub struct SenderStart<'a> {
    params: &'a RsaParams,
    m0: BigUint,
    m1: BigUint,
}

impl<'a> SenderStart<'a> {
    pub fn new(params: &'a RsaParams, m0: BigUint, m1: BigUint) -> Result<Self, OTSenderError> {
        if m0 >= params.n || m1 >= params.n {
            return Err(OTSenderError::MessageTooLarge);
        }
        Ok(Self { params, m0, m1 })
    }

    /// Message 1. Sessions sharing a key may send it once.
    pub fn public_key(&self) -> RsaPublicKey {
        self.params.public_key()
    }

    /// Draw the two blinding values and produce message 2.
    pub fn blind<R: Rng + CryptoRng>(self, rng: &mut R) -> (SenderBlinded<'a>, BlindsMsg) {
        let bits = self.params.bits() as u64;
        let x0 = rng.gen_biguint(bits);
        let x1 = rng.gen_biguint(bits);
        let msg = BlindsMsg {
            x0: x0.clone(),
            x1: x1.clone(),
        };
        let next = SenderBlinded {
            params: self.params,
            m0: self.m0,
            m1: self.m1,
            x0,
            x1,
        };
        (next, msg)
    }
}

/// Sender session waiting for message 3.
pub struct SenderBlinded<'a> {
    params: &'a RsaParams,
    m0: BigUint,
    m1: BigUint,
    x0: BigUint,
    x1: BigUint,
}

impl<'a> SenderBlinded<'a> {
    /// Answer the receiver's query with message 4, ending the session.
    pub fn respond(self, query: &QueryMsg) -> Result<MaskedMsg, OTSenderError> {
        let n = &self.params.n;
        if query.v >= *n {
            return Err(OTSenderError::InvalidQuery);
        }
        let k0 = sub_mod(&query.v, &self.x0, n).modpow(&self.params.d, n);
        let k1 = sub_mod(&query.v, &self.x1, n).modpow(&self.params.d, n);
        Ok(MaskedMsg {
            m0k: (self.m0 + k0) % n,
            m1k: (self.m1 + k1) % n,
        })
    }
}

/// Receiver session before message 1.
pub struct ReceiverStart {
    choice: bool,
}

impl ReceiverStart {
    pub fn new(choice: bool) -> Self {
        Self { choice }
    }

    pub fn from_bit(bit: u8) -> Result<Self, OTReceiverError> {
        match bit {
            0 => Ok(Self::new(false)),
            1 => Ok(Self::new(true)),
            _ => Err(OTReceiverError::InvalidChoice(bit)),
        }
    }

    /// Accept message 1.
    pub fn receive_key(self, pk: RsaPublicKey) -> Result<ReceiverKeyed, OTReceiverError> {
        if pk.n <= BigUint::one() || pk.e.is_zero() {
            return Err(OTReceiverError::InvalidPublicKey);
        }
        Ok(ReceiverKeyed {
            choice: self.choice,
            pk,
        })
    }
}

/// Receiver session waiting for message 2.
pub struct ReceiverKeyed {
    choice: bool,
    pk: RsaPublicKey,
}

impl ReceiverKeyed {
    /// Accept message 2 and produce message 3.
    pub fn query<R: Rng + CryptoRng>(
        self,
        rng: &mut R,
        blinds: &BlindsMsg,
    ) -> (ReceiverQueried, QueryMsg) {
        let n = &self.pk.n;
        let k = rng.gen_biguint_below(n);
        let x = if self.choice { &blinds.x1 } else { &blinds.x0 };
        let v = (x + k.modpow(&self.pk.e, n)) % n;
        let next = ReceiverQueried {
            choice: self.choice,
            n: self.pk.n,
            k,
        };
        (next, QueryMsg { v })
    }
}

/// Receiver session waiting for message 4.
pub struct ReceiverQueried {
    choice: bool,
    n: BigUint,
    k: BigUint,
}

impl ReceiverQueried {
    /// Accept message 4 and recover the chosen message.
    pub fn finish(self, masked: &MaskedMsg) -> BigUint {
        let mbk = if self.choice { &masked.m1k } else { &masked.m0k };
        sub_mod(mbk, &self.k, &self.n)
    }
}

/// Runs a batch of transfers of blocks over a channel, all under one RSA key.
pub struct RsaOtSender {
    params: RsaParams,
}

impl RsaOtSender {
    pub fn new(params: RsaParams) -> Self {
        Self { params }
    }

    /// Generate a fresh `bits`-bit key.
    pub fn generate<R: Rng + CryptoRng>(
        rng: &mut R,
        bits: usize,
        rounds: usize,
    ) -> Result<Self, OTSenderError> {
        let params = RsaParams::generate_with_rounds(rng, bits, rounds)?;
        log::debug!("generated {}-bit RSA key for oblivious transfer", bits);
        Ok(Self::new(params))
    }

    pub fn public_key(&self) -> RsaPublicKey {
        self.params.public_key()
    }
}

impl OtSender for RsaOtSender {
    type Msg = Block;

    fn send<C: AbstractChannel, R: CryptoRng + Rng>(
        &mut self,
        channel: &mut C,
        inputs: &[(Block, Block)],
        rng: &mut R,
    ) -> Result<(), OTSenderError> {
        let sessions = inputs
            .iter()
            .map(|(m0, m1)| {
                SenderStart::new(&self.params, block_to_biguint(m0), block_to_biguint(m1))
            })
            .collect::<Result<Vec<_>, _>>()?;

        channel.write_usize(sessions.len())?;
        let pk = self.params.public_key();
        channel.write_biguint(&pk.e)?;
        channel.write_biguint(&pk.n)?;
        channel.flush()?;

        for (i, session) in sessions.into_iter().enumerate() {
            let (session, blinds) = session.blind(rng);
            channel.write_biguint(&blinds.x0)?;
            channel.write_biguint(&blinds.x1)?;
            channel.flush()?;

            let query = QueryMsg {
                v: channel.read_biguint()?,
            };
            let masked = session.respond(&query)?;
            channel.write_biguint(&masked.m0k)?;
            channel.write_biguint(&masked.m1k)?;
            channel.flush()?;
            log::debug!("OT session {} sent", i);
        }

        log::info!("sent {} oblivious transfers", inputs.len());
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RsaOtReceiver;

impl OtReceiver for RsaOtReceiver {
    type Msg = Block;

    fn receive<C: AbstractChannel, R: CryptoRng + Rng>(
        &mut self,
        channel: &mut C,
        inputs: &[bool],
        rng: &mut R,
    ) -> Result<Vec<Block>, OTReceiverError> {
        let count = channel.read_usize()?;
        if count != inputs.len() {
            return Err(OTReceiverError::InvalidInputLength);
        }
        let pk = RsaPublicKey {
            e: channel.read_biguint()?,
            n: channel.read_biguint()?,
        };
        log::trace!("received {}-bit OT public key", pk.n.bits());

        let mut res = Vec::with_capacity(inputs.len());
        for (i, choice) in inputs.iter().enumerate() {
            let session = ReceiverStart::new(*choice).receive_key(pk.clone())?;
            let blinds = BlindsMsg {
                x0: channel.read_biguint()?,
                x1: channel.read_biguint()?,
            };
            let (session, query) = session.query(rng, &blinds);
            channel.write_biguint(&query.v)?;
            channel.flush()?;

            let masked = MaskedMsg {
                m0k: channel.read_biguint()?,
                m1k: channel.read_biguint()?,
            };
            let m = session.finish(&masked);
            res.push(biguint_to_block(&m).ok_or(OTReceiverError::MessageOutOfRange)?);
            log::debug!("OT session {} received", i);
        }

        log::info!("received {} oblivious transfers", inputs.len());
        Ok(res)
    }
}
