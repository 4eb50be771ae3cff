use proptest::prelude::*;
use sdram_init_core::mode_register::legacy::{self, LegacyKind};
use sdram_init_core::mode_register::{LookupTable, ModeRegisterValue, ddr2, ddr3, ddr4};

fn keys(table: &LookupTable<u32>) -> impl Strategy<Value = u32> + use<> {
    prop::sample::select(table.keys().collect::<Vec<_>>())
}

fn codes(table: &LookupTable<&'static str>) -> impl Strategy<Value = u16> + use<> {
    prop::sample::select(table.entries().iter().map(|&(_, code)| code).collect::<Vec<_>>())
}

fn legacy_kind() -> impl Strategy<Value = LegacyKind> {
    prop_oneof![
        Just(LegacyKind::Sdr),
        Just(LegacyKind::Ddr),
        Just(LegacyKind::Lpddr)
    ]
}

proptest! {
    #[test]
    fn legacy_mr_roundtrip(
        kind in legacy_kind(),
        burst_length in keys(&legacy::BURST_LENGTH),
        cas_latency in keys(&legacy::SDR_CAS_LATENCY),
        dll_reset in any::<bool>(),
    ) {
        let mr = legacy::Mr { burst_length, cas_latency, dll_reset };
        let value = mr.encode(kind).unwrap();
        prop_assert_eq!(legacy::Mr::decode(kind, value), Some(mr));
    }

    #[test]
    fn ddr2_mr_roundtrip(
        cas_latency in keys(&ddr2::CAS_LATENCY),
        write_recovery in keys(&ddr2::WRITE_RECOVERY),
        dll_reset in any::<bool>(),
    ) {
        let mr = ddr2::Mr {
            burst_length: ddr2::DEFAULT_BURST_LENGTH,
            cas_latency,
            write_recovery,
            dll_reset,
        };
        prop_assert_eq!(ddr2::Mr::decode(mr.encode().unwrap()), Some(mr));
    }

    #[test]
    fn ddr3_mr0_roundtrip(
        burst_length in keys(&sdram_init_core::mode_register::DDRX_BURST_LENGTH),
        cas_latency in keys(&ddr3::CAS_LATENCY),
        write_recovery in keys(&ddr3::WRITE_RECOVERY),
        dll_reset in any::<bool>(),
    ) {
        let mr0 = ddr3::Mr0 { burst_length, cas_latency, write_recovery, dll_reset };
        prop_assert_eq!(ddr3::Mr0::decode(mr0.encode().unwrap()), Some(mr0));
    }

    #[test]
    fn ddr3_mr1_mr2_roundtrip(
        ron in codes(&sdram_init_core::electrical::DDR3.ron),
        rtt_nom in codes(&sdram_init_core::electrical::DDR3.rtt_nom),
        rtt_wr in codes(&sdram_init_core::electrical::DDR3.rtt_wr),
        cas_write_latency in keys(&ddr3::CAS_WRITE_LATENCY),
        write_leveling in any::<bool>(),
    ) {
        let mr1 = ddr3::Mr1 { ron, rtt_nom, write_leveling };
        prop_assert_eq!(ddr3::Mr1::decode(mr1.encode()), mr1);
        let mr2 = ddr3::Mr2 { cas_write_latency, rtt_wr };
        prop_assert_eq!(ddr3::Mr2::decode(mr2.encode().unwrap()), Some(mr2));
    }

    #[test]
    fn ddr4_mr0_roundtrip(
        burst_length in keys(&sdram_init_core::mode_register::DDRX_BURST_LENGTH),
        cas_latency in keys(&ddr4::CAS_LATENCY),
        write_recovery in keys(&ddr4::WRITE_RECOVERY),
        dll_reset in any::<bool>(),
    ) {
        let mr0 = ddr4::Mr0 { burst_length, cas_latency, write_recovery, dll_reset };
        prop_assert_eq!(ddr4::Mr0::decode(mr0.encode().unwrap()), Some(mr0));
    }

    #[test]
    fn ddr4_mr1_mr2_mr6_roundtrip(
        ron in codes(&sdram_init_core::electrical::DDR4.ron),
        rtt_nom in codes(&sdram_init_core::electrical::DDR4.rtt_nom),
        rtt_wr in codes(&sdram_init_core::electrical::DDR4.rtt_wr),
        cas_write_latency in keys(&ddr4::CAS_WRITE_LATENCY),
        tccd_l in keys(&ddr4::CCD_L),
        dll_enable in any::<bool>(),
        write_leveling in any::<bool>(),
    ) {
        let mr1 = ddr4::Mr1 { dll_enable, ron, rtt_nom, write_leveling };
        prop_assert_eq!(ddr4::Mr1::decode(mr1.encode()), mr1);
        let mr2 = ddr4::Mr2 { cas_write_latency, rtt_wr };
        prop_assert_eq!(ddr4::Mr2::decode(mr2.encode().unwrap()), Some(mr2));
        let mr6 = ddr4::Mr6 { tccd_l };
        prop_assert_eq!(ddr4::Mr6::decode(mr6.encode().unwrap()), Some(mr6));
    }

    #[test]
    fn write_leveling_toggles_only_a7(mr1 in any::<u16>(), enabled in any::<bool>()) {
        let value = sdram_init_core::mode_register::write_leveling_mr1(mr1, enabled);
        prop_assert_eq!(ModeRegisterValue::new(value).bit(7), enabled);
        prop_assert_eq!(value & !(1 << 7), mr1 & !(1 << 7));
    }
}
