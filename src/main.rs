fn main() {
    kitchen_api::main();
}
