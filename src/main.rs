fn main() -> anyhow::Result<()> {
    voltstock_lib::run()
}
