pub mod config;
pub mod garble;
pub mod ot;
pub mod twopc_prot;

pub use config::*;
pub use garble::*;
pub use ot::*;
pub use twopc_prot::*;

use crypto_core::AbstractChannel;
use std::io::{Error, ErrorKind, Result};

/// Cap on capacity reserved from a length read off the wire.
const MAX_PREALLOC: usize = 1 << 16;

/// Largest gate arity and table size a peer may announce.
const MAX_GATE_INPUTS: usize = 2;
const MAX_TABLE_ROWS: usize = 1 << MAX_GATE_INPUTS;

pub fn send_gc<C: AbstractChannel>(channel: &mut C, gc: &GarbledCircuit) -> Result<()> {
    channel.write_usize(gc.wires.len())?;
    for wire in gc.wires.iter() {
        match wire {
            GarbledWire::Input => channel.write_bool(false)?,
            GarbledWire::Gate { table, inputs } => {
                channel.write_bool(true)?;
                send_indices(channel, inputs)?;
                channel.write_usize(table.len())?;
                for row in table.iter() {
                    channel.write_ciphertext(row)?;
                }
            }
        }
    }
    log::trace!(
        "sent garbled circuit: {} wires, {} rows",
        gc.len(),
        gc.nrows()
    );
    Ok(())
}

pub fn receive_gc<C: AbstractChannel>(channel: &mut C) -> Result<GarbledCircuit> {
    let len = channel.read_usize()?;
    let mut wires = Vec::with_capacity(len.min(MAX_PREALLOC));

    for id in 0..len {
        if !channel.read_bool()? {
            wires.push(GarbledWire::Input);
            continue;
        }
        let inputs = receive_indices(channel)?;
        let nrows = channel.read_usize()?;
        if inputs.len() > MAX_GATE_INPUTS || nrows > MAX_TABLE_ROWS {
            return Err(Error::new(
                ErrorKind::InvalidData,
                format!(
                    "wire {} announces {} inputs and {} rows",
                    id,
                    inputs.len(),
                    nrows
                ),
            ));
        }
        let mut table = Vec::with_capacity(nrows);
        for _ in 0..nrows {
            table.push(channel.read_ciphertext()?);
        }
        wires.push(GarbledWire::Gate { table, inputs });
    }

    let gc = GarbledCircuit::new(wires);
    log::trace!(
        "received garbled circuit: {} wires, {} rows",
        gc.len(),
        gc.nrows()
    );
    Ok(gc)
}

pub fn send_wirelabels<C: AbstractChannel>(channel: &mut C, wls: &[WireLabel]) -> Result<()> {
    channel.write_usize(wls.len())?;
    for wl in wls.iter() {
        channel.write_usize(wl.id)?;
        channel.write_block(&wl.label)?;
    }
    Ok(())
}

pub fn receive_wirelabels<C: AbstractChannel>(channel: &mut C) -> Result<Vec<WireLabel>> {
    let len = channel.read_usize()?;
    let mut res = Vec::with_capacity(len.min(MAX_PREALLOC));
    for _ in 0..len {
        let id = channel.read_usize()?;
        let label = channel.read_block()?;
        res.push(WireLabel { id, label });
    }
    Ok(res)
}

pub fn send_indices<C: AbstractChannel>(channel: &mut C, ids: &[usize]) -> Result<()> {
    channel.write_usize(ids.len())?;
    for id in ids.iter() {
        channel.write_usize(*id)?;
    }
    Ok(())
}

pub fn receive_indices<C: AbstractChannel>(channel: &mut C) -> Result<Vec<usize>> {
    let len = channel.read_usize()?;
    let mut res = Vec::with_capacity(len.min(MAX_PREALLOC));
    for _ in 0..len {
        res.push(channel.read_usize()?);
    }
    Ok(res)
}

#[cfg(test)]
mod tests {
    use circuit::Circuit;
    use crypto_core::{local_channel_pair, AbstractChannel, AesRng, Block};
    use rand::Rng;
    use std::io::ErrorKind;
    use std::thread;

    use crate::{
        receive_gc, receive_indices, receive_wirelabels, send_gc, send_indices, send_wirelabels,
        GCGenerator, WireLabel, YaoGenerator,
    };

    #[test]
    fn send_recv_wls_test() {
        let mut rng = AesRng::new();
        let size = 100;
        let wls = (0..size)
            .map(|x| {
                let label = rng.gen::<Block>();
                WireLabel { id: x, label }
            })
            .collect::<Vec<WireLabel>>();

        let wls1 = wls.clone();

        let (mut sender, mut receiver) = local_channel_pair().unwrap();

        let handle = thread::spawn(move || {
            send_wirelabels(&mut sender, &wls1).unwrap();
            send_indices(&mut sender, &[3, 1, 4, 1, 5]).unwrap();
            send_indices(&mut sender, &[]).unwrap();
            sender.flush().unwrap();
        });

        assert_eq!(receive_wirelabels(&mut receiver).unwrap(), wls);
        assert_eq!(receive_indices(&mut receiver).unwrap(), vec![3, 1, 4, 1, 5]);
        assert!(receive_indices(&mut receiver).unwrap().is_empty());

        handle.join().unwrap();
    }

    #[test]
    fn send_recv_gc_test() {
        let mut rng = AesRng::new();
        let circ = Circuit::load("../circuit/circuit_files/adder32.json").unwrap();
        let gc = YaoGenerator::default().garble(&mut rng, &circ).unwrap().gc;

        let gc1 = gc.clone();

        let (mut sender, mut receiver) = local_channel_pair().unwrap();

        let handle = thread::spawn(move || {
            send_gc(&mut sender, &gc1).unwrap();
            sender.flush().unwrap();
        });

        assert_eq!(receive_gc(&mut receiver).unwrap(), gc);

        handle.join().unwrap();
    }

    #[test]
    fn recv_oversized_gate_test() {
        let (mut sender, mut receiver) = local_channel_pair().unwrap();

        let handle = thread::spawn(move || {
            sender.write_usize(1).unwrap();
            sender.write_bool(true).unwrap();
            send_indices(&mut sender, &[0, 1, 2]).unwrap();
            sender.write_usize(8).unwrap();
            sender.flush().unwrap();
        });

        let err = receive_gc(&mut receiver).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);

        handle.join().unwrap();
    }
}
