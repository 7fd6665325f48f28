impl Default for super::settings::Server {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8080,
            workers: num_cpus::get_physical(),
        }
    }
}
