fn main() -> anyhow::Result<()> {
    timeuse_lib::run()
}
