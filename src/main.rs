fn main() -> anyhow::Result<()> {
    lead_capture_lib::run()
}
