fn main() {
    println!("cargo:rerun-if-env-changed=WIFI_SSID");
    println!("cargo:rerun-if-env-changed=WIFI_PASS");
    println!("cargo:rerun-if-env-changed=GARAGE_NODE_CONFIG");

    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
