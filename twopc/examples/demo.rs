use std::net::TcpStream;
use std::path::PathBuf;

use circuit::Circuit;
use crypto_core::{AesRng, CommandLineOpt, NetChannel};
use structopt::StructOpt;
use twopc::{Party, ProtocolConfig, TwopcProtocol};

#[derive(StructOpt, Debug)]
struct Opt {
    #[structopt(flatten)]
    net: CommandLineOpt,

    /// Circuit to evaluate, JSON or gate-level Verilog (`.v`).
    #[structopt(
        short,
        long,
        parse(from_os_str),
        default_value = "circuit/circuit_files/and32.json"
    )]
    circuit: PathBuf,

    /// Protocol parameters as JSON. Missing fields take their defaults.
    #[structopt(long, parse(from_os_str))]
    config: Option<PathBuf>,

    /// This party's input.
    #[structopt(long, default_value = "0")]
    input: u64,
}

fn load_config(path: &Option<PathBuf>) -> ProtocolConfig {
    match path {
        Some(path) => {
            let json = std::fs::read_to_string(path).unwrap();
            serde_json::from_str(&json).unwrap()
        }
        None => ProtocolConfig::default(),
    }
}

fn demo(netio: NetChannel<TcpStream, TcpStream>, opt: &Opt) {
    let circ = match opt.circuit.extension().and_then(|e| e.to_str()) {
        Some("v") => Circuit::load_verilog(&opt.circuit).unwrap(),
        _ => Circuit::load(&opt.circuit).unwrap(),
    };
    let config = load_config(&opt.config);
    let party = if netio.is_server() {
        Party::Garbler
    } else {
        Party::Evaluator
    };

    let mut rng = AesRng::new();
    let mut prot = TwopcProtocol::new(netio, party, config).unwrap();
    let output = prot.compute(&mut rng, &circ, opt.input).unwrap();

    println!("=============================");
    println!("Compute {} with 2PC Protocol\n", opt.circuit.display());
    println!("The input of the {:?} is: {}", party, opt.input);
    match output {
        Some(output) => {
            println!("The outputs are:");
            for (name, value) in output.values.iter() {
                println!("{} = {}", name, value);
            }
        }
        None => println!("The outputs were revealed to the garbler."),
    }
    let (read, written, flushes) = prot.channel.stats();
    println!(
        "read {} bytes, wrote {} bytes, {} flushes",
        read, written, flushes
    );
}

// run the main function in two terminals
// cargo run --example demo -- --is-server 1 --input 9001
// cargo run --example demo -- --is-server 0 --input 1337
pub fn main() {
    pretty_env_logger::init();
    let opt = Opt::from_args();
    let is_server = opt.net.is_server != 0;
    let netio = NetChannel::new(is_server, &opt.net.address).unwrap();
    demo(netio, &opt);
}
