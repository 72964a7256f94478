use std::net::TcpStream;

use crypto_core::CommandLineOpt;
use crypto_core::{AesRng, Block, NetChannel};
use structopt::StructOpt;
use twopc::ot::{OtReceiver, OtSender, RsaOtReceiver, RsaOtSender};

#[derive(StructOpt, Debug)]
struct Opt {
    #[structopt(flatten)]
    net: CommandLineOpt,

    /// Number of transfers.
    #[structopt(short, long, default_value = "8")]
    num: usize,

    /// Size of the RSA modulus in bits.
    #[structopt(long, default_value = "2048")]
    rsa_bits: usize,
}

fn rand_block_vec(size: usize) -> Vec<Block> {
    (0..size).map(|_| rand::random::<Block>()).collect()
}

fn rand_bool_vec(size: usize) -> Vec<bool> {
    (0..size).map(|_| rand::random::<bool>()).collect()
}

fn rsa_ot_test(netio: &mut NetChannel<TcpStream, TcpStream>, num: usize, rsa_bits: usize) {
    let mut rng = AesRng::new();
    if netio.is_server() {
        let m0 = rand_block_vec(num);
        let m1 = rand_block_vec(num);
        let m: Vec<(Block, Block)> = m0.into_iter().zip(m1.into_iter()).collect();
        let mut ot = RsaOtSender::generate(&mut rng, rsa_bits, 40).unwrap();
        ot.send(netio, &m, &mut rng).unwrap();
        println!("send blocks: {:?}", m);
    } else {
        let select = rand_bool_vec(num);
        let mut ot = RsaOtReceiver;
        let result = ot.receive(netio, &select, &mut rng).unwrap();
        println!("select bits: {:?}", select);
        println!("received blocks: {:?}", result);
    }
    let (read, written, flushes) = netio.stats();
    println!(
        "read {} bytes, wrote {} bytes, {} flushes",
        read, written, flushes
    );
}

// run the main function in two terminals
// cargo run --example ot -- --is-server 1
// cargo run --example ot -- --is-server 0
pub fn main() {
    pretty_env_logger::init();
    let opt = Opt::from_args();
    let is_server = opt.net.is_server != 0;
    let mut netio = NetChannel::new(is_server, &opt.net.address).unwrap();
    rsa_ot_test(&mut netio, opt.num, opt.rsa_bits);
}
