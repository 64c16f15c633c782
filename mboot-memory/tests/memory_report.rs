use mboot_memory::{
    ExtMemDescriptor, ExtMemId, ExtMemPropTags, FlashRegion, Lookup, MemId, MemoryError,
    MemoryRegion, RamRegion,
};
use pretty_assertions::assert_eq;
use tracing_subscriber::EnvFilter;

fn init_logging() {
    // Several tests race for the global subscriber, only the first one wins.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

const EMPTY_FLASH_MEMORY_MAP: &str = "
- Flash:
    index: 0
    start: 0x0
    size: 0x0
    sector_size: 0x1000
";

const KW45_MEMORY_MAP: &str = "
- Flash:
    index: 0
    start: 0x0
    size: 0x100000
    sector_size: 0x2000
- Ram:
    index: 0
    start: 0x14000000
    size: 0x4000
- Ram:
    index: 1
    start: 0x20000000
    size: 0x1c000
";

#[test]
fn internal_memory_report() {
    init_logging();

    let regions: Vec<MemoryRegion> = serde_yaml::from_str(KW45_MEMORY_MAP).unwrap();
    let report = regions
        .iter()
        .map(|region| region.to_string())
        .collect::<Vec<_>>();

    assert_eq!(
        report,
        [
            "Region 0: 0x00000000 - 0x000FFFFF; Total Size: 1.0 MiB Sector size: 8.0 KiB",
            "Region 0: 0x14000000 - 0x14003FFF; Total Size: 16.0 KiB",
            "Region 1: 0x20000000 - 0x2001BFFF; Total Size: 112.0 KiB",
        ]
    );

    let ram = regions.iter().filter_map(MemoryRegion::as_ram_region);
    assert_eq!(ram.map(RamRegion::size).sum::<u64>(), 0x20000);

    let boot = regions.iter().find(|region| region.contains(0x400)).unwrap();
    assert!(boot.is_flash());
}

#[test]
fn memory_map_with_an_empty_region_is_rejected() {
    let error = serde_yaml::from_str::<Vec<MemoryRegion>>(EMPTY_FLASH_MEMORY_MAP).unwrap_err();
    assert!(error.to_string().contains("the region is empty"), "{error}");
}

#[test]
fn external_memory_report() {
    init_logging();

    // What a device with one configured FlexSPI NOR flash answers for each memory id.
    let flex_spi: &[u32] = &[0x1f, 0x6000_0000, 0x2000, 0x100, 0x1000, 0x10000];
    let responses: [(ExtMemId, Option<&[u32]>); 4] = [
        (ExtMemId::QuadSpi0, None),
        (ExtMemId::FlexSpiNor, Some(flex_spi)),
        (ExtMemId::SemcNand, Some(&[0x0][..])),
        (ExtMemId::SdCard, Some(&[0x2, 0, 0x1d_b000][..])),
    ];

    let report = responses
        .into_iter()
        .map(|(mem, raw)| -> Result<String, MemoryError> {
            let descriptor = ExtMemDescriptor::decode(mem.id(), raw)?;
            Ok(format!("{}: {descriptor}", descriptor.name()?))
        })
        .collect::<Result<Vec<_>, MemoryError>>()
        .unwrap();

    assert_eq!(
        report,
        [
            "QSPI: Not Configured",
            "FLEX-SPI-NOR: Start Address = 0x60000000  Total Size = 8.0 MiB  Page Size = 256  Sector Size = 4096  Block Size = 65536",
            "SEMC-NAND: Not Configured",
            "SD: Total Size = 1.9 GiB",
        ]
    );
}

#[test]
fn descriptors_are_shared_across_threads() {
    let raw = [0x3, 0x0800_0000, 64];
    let descriptors = std::thread::scope(|scope| {
        let handles = MemId::iter()
            .map(|mem| scope.spawn(move || ExtMemDescriptor::decode(mem.id(), Some(&raw[..]))))
            .collect::<Vec<_>>();

        handles
            .into_iter()
            .map(|handle| handle.join().unwrap().unwrap())
            .collect::<Vec<_>>()
    });

    assert_eq!(descriptors.len(), ExtMemId::ALL.len() + 1);
    for descriptor in &descriptors {
        assert_eq!(
            descriptor.reported_tags(),
            ExtMemPropTags::START_ADDRESS | ExtMemPropTags::SIZE_IN_KBYTES
        );
        assert!(descriptor.name().is_ok());
    }
}

#[test]
fn malformed_and_unknown_inputs() {
    assert_eq!(
        ExtMemDescriptor::decode(ExtMemId::SpiNand.id(), Some(&[0x8, 0, 0, 0][..])),
        Err(MemoryError::MalformedPropertyVector {
            mask: 0x8,
            required: 5,
            len: 4,
        })
    );

    assert_eq!(
        MemId::lookup(9999),
        Err(MemoryError::UnknownIdentifier(Lookup::Id(9999)))
    );
    let descriptor = ExtMemDescriptor::decode(9999, Some(&[0x1, 0x1000][..])).unwrap();
    assert_eq!(
        descriptor.name(),
        Err(MemoryError::UnknownIdentifier(Lookup::Id(9999)))
    );

    assert!(FlashRegion::new(0, 0x1000, 0x1000, 0).is_err());
}
