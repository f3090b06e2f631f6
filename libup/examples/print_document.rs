//! Parse a small UP document, print its tree, and look up a key.

use libup::{encode, parse, Format, Value};

const SOURCE: &str = "\
name John Doe
age!int 30
active!bool true

server {
  host localhost
  port!int 8080
  debug!bool false
}

items [
apple
banana
cherry
]
";

fn main() {
    println!("Parsing UP document...\n");

    let doc = parse(SOURCE);
    println!("Parsed {} top-level nodes:\n", doc.len());
    print!("{}", encode(&doc, Format::Tree));

    if let Some(Value::String(name)) = doc.get("name").map(|node| &node.value) {
        println!("\nName lookup: {}", name);
    }

    let port = doc
        .get("server")
        .and_then(|node| node.value.as_block())
        .and_then(|server| server.get("port"))
        .and_then(Value::as_str);
    if let Some(port) = port {
        println!("Port lookup: {}", port);
    }
}
