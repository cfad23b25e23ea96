// Keine Standard-Bibliothek verwenden (Embedded System)
#![no_std]
// Kein normaler main() Einstiegspunkt (wird von esp_rtos bereitgestellt)
#![no_main]
// Verbiete mem::forget - gefährlich bei ESP HAL Types mit DMA-Buffern
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those \
    holding buffers for the duration of a data transfer."
)]
// Verbiete große Stack-Frames (Stack ist auf Embedded Systemen begrenzt)
#![deny(clippy::large_stack_frames)]

// Heap Allocator (WiFi und HTTP-Bodies benötigen dynamischen Speicher)
extern crate alloc;

// Embassy Async Runtime
use defmt::info;
use embassy_executor::Spawner;
use embassy_net::{Config as NetConfig, Ipv4Cidr, Stack, StackResources, StaticConfigV4};
use embassy_time::{Duration, Timer};

// ESP32-C6 HAL
use esp_hal::clock::CpuClock;
use esp_hal::rng::Rng;
use esp_hal::timer::timg::TimerGroup;

// Backtrace bei Panic und println!() Support
use {esp_backtrace as _, esp_println as _};

// Projekt-Module und Konfiguration
use esp_ap_status::STATIONS;
use esp_ap_status::config::{
    AP_IP_ADDRESS, AP_PREFIX_LEN, EXTRA_HEAP_SIZE, HTTP_TASK_POOL_SIZE, NET_SOCKET_COUNT,
    WIFI_HEAP_SIZE,
};
use esp_ap_status::tasks::{
    access_point_task, dhcp_server_task, heartbeat_task, http_server_task, mdns_responder_task,
    net_task,
};

// ESP-IDF App Descriptor - erforderlich für den Bootloader!
// Ohne diesen schlägt das Flashen mit "ESP-IDF App Descriptor missing" fehl
esp_bootloader_esp_idf::esp_app_desc!();

/// Main Entry Point
///
/// Reihenfolge: Heap + Scheduler → Radio → Netzwerk-Stack → Access Point →
/// HTTP-Listener → Heartbeat. Danach schläft main() - alle Arbeit läuft in Tasks.
///
/// Fehler beim Plattform-Bootstrap sind fatal (Panic → esp-backtrace).
#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    // ESP32-C6 Konfiguration: CPU auf maximale Taktfrequenz (160 MHz)
    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    // Heap Allocator initialisieren
    // Zwei Bereiche: reclaimed RAM (64 KB) + extra (36 KB) = 100 KB total
    esp_alloc::heap_allocator!(
        #[esp_hal::ram(reclaimed)]
        size: WIFI_HEAP_SIZE
    );
    esp_alloc::heap_allocator!(size: EXTRA_HEAP_SIZE);

    // Embassy Runtime initialisieren (Timer + Software Interrupt)
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    let sw_interrupt =
        esp_hal::interrupt::software::SoftwareInterruptControl::new(peripherals.SW_INTERRUPT);
    esp_rtos::start(timg0.timer0, sw_interrupt.software_interrupt0);

    // WiFi Hardware initialisieren
    static RADIO_INIT: static_cell::StaticCell<esp_radio::Controller> =
        static_cell::StaticCell::new();
    let radio_init =
        RADIO_INIT.init(esp_radio::init().expect("Failed to initialize Wi-Fi/BLE controller"));

    let (wifi_controller, wifi_interfaces) =
        esp_radio::wifi::new(radio_init, peripherals.WIFI, Default::default())
            .expect("Failed to initialize Wi-Fi");

    // Random seed für TCP/IP Stack (von Hardware RNG)
    let rng = Rng::new();
    let seed = u64::from(rng.random()) << 32 | u64::from(rng.random());

    static RESOURCES: static_cell::StaticCell<StackResources<NET_SOCKET_COUNT>> =
        static_cell::StaticCell::new();
    let resources = RESOURCES.init(StackResources::new());

    // Statische IP auf dem AP-Interface, Stationen bekommen Adressen vom DHCP-Task
    let net_config = NetConfig::ipv4_static(StaticConfigV4 {
        address: Ipv4Cidr::new(AP_IP_ADDRESS, AP_PREFIX_LEN),
        gateway: Some(AP_IP_ADDRESS),
        dns_servers: Default::default(),
    });
    let (stack, runner) = embassy_net::new(wifi_interfaces.ap, net_config, resources, seed);

    // Stack muss 'static sein für Tasks
    static STACK: static_cell::StaticCell<Stack<'static>> = static_cell::StaticCell::new();
    let stack = &*STACK.init(stack);

    // 1. Access Point + Netzwerk
    spawner
        .spawn(access_point_task(wifi_controller, &STATIONS))
        .unwrap();
    spawner.spawn(net_task(runner)).unwrap();
    spawner.spawn(dhcp_server_task(stack)).unwrap();

    // 2. HTTP-Listener (warten selbst auf den AP-Link)
    for task_id in 0..HTTP_TASK_POOL_SIZE {
        spawner
            .spawn(http_server_task(task_id, stack, &STATIONS))
            .unwrap();
    }

    // 3. Heartbeat
    spawner.spawn(heartbeat_task(peripherals.GPIO2)).unwrap();

    // mDNS Responder (für ca360-esp32.local)
    spawner.spawn(mdns_responder_task(stack)).unwrap();

    info!("System ready. Access /info or /clients via browser.");

    // Main-Loop: schläft (alle Arbeit läuft in Tasks)
    loop {
        Timer::after(Duration::from_secs(3600)).await;
    }
}
