use num_bigint::{BigUint, RandBigInt};
use std::net::TcpStream;
use structopt::StructOpt;

use crypto_core::{AbstractChannel, AesRng, Block, CommandLineOpt, NetChannel};
use rand::random;

fn send_values(netio: &mut NetChannel<TcpStream, TcpStream>, rng: &mut AesRng) {
    let send_bytes = random::<[u8; 10]>();
    let send_bool = random::<bool>();
    let send_usize = random::<u32>() as usize;
    let send_block = random::<Block>();
    let send_biguint: BigUint = rng.gen_biguint(1024);

    println!("send_bytes: {:?}", send_bytes);
    println!("send_bool: {:?}", send_bool);
    println!("send_usize: {:?}", send_usize);
    println!("send_block: {:?}", send_block);
    println!("send_biguint: {}", send_biguint);

    netio.write_bytes(&send_bytes).unwrap();
    netio.write_bool(send_bool).unwrap();
    netio.write_usize(send_usize).unwrap();
    netio.write_block(&send_block).unwrap();
    netio.write_biguint(&send_biguint).unwrap();

    netio.flush().unwrap();
}

fn recv_values(netio: &mut NetChannel<TcpStream, TcpStream>) {
    let mut recv_bytes = [0u8; 10];
    netio.read_bytes(&mut recv_bytes).unwrap();
    let recv_bool = netio.read_bool().unwrap();
    let recv_usize = netio.read_usize().unwrap();
    let recv_block = netio.read_block().unwrap();
    let recv_biguint = netio.read_biguint().unwrap();

    println!("recv_bytes: {:?}", recv_bytes);
    println!("recv_bool: {:?}", recv_bool);
    println!("recv_usize: {:?}", recv_usize);
    println!("recv_block: {:?}", recv_block);
    println!("recv_biguint: {}", recv_biguint);
}

fn net_channel_test(netio: &mut NetChannel<TcpStream, TcpStream>) {
    let mut rng = AesRng::new();
    if netio.is_server() {
        send_values(netio, &mut rng);
        recv_values(netio);
    } else {
        recv_values(netio);
        send_values(netio, &mut rng);
    }
}

// run the main function in two terminals
// cargo run --example netio -- --is-server 1
// cargo run --example netio -- --is-server 0
pub fn main() {
    let opt = CommandLineOpt::from_args();
    let is_server = opt.is_server != 0;
    let mut netio = NetChannel::new(is_server, &opt.address).unwrap();
    net_channel_test(&mut netio);
}
