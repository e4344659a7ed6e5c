use pretty_assertions::assert_eq;
use subnet_core::Ipv4Net;

#[test]
fn serializes_as_cidr_string() {
    let net: Ipv4Net = "10.30.100.0/24".parse().expect("valid cidr");
    let json = serde_json::to_string(&net).expect("serialize");
    assert_eq!(json, "\"10.30.100.0/24\"");
}

#[test]
fn deserializes_from_cidr_string() {
    let net: Ipv4Net = serde_json::from_str("\"10.30.100.0/24\"").expect("deserialize");
    assert_eq!(net.to_string(), "10.30.100.0/24");
    assert_eq!(net.prefix_len(), 24);
}

#[test]
fn deserialize_rejects_bad_cidr() {
    let err = serde_json::from_str::<Ipv4Net>("\"10.30.100.0\"");
    assert!(err.is_err());

    let err = serde_json::from_str::<Ipv4Net>("\"10.30.100.0/40\"");
    assert!(err.is_err());
}

#[test]
fn round_trips_through_json() {
    let net: Ipv4Net = "172.20.4.0/22".parse().expect("valid cidr");
    let json = serde_json::to_string(&net).expect("serialize");
    let back: Ipv4Net = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(net, back);
}
